//! Statement text for the resource tables.
//!
//! Only a descriptor's static table name and column list are formatted in;
//! every value is a `$n` placeholder bound by the caller.

use catalog_core::resource::ResourceSpec;

/// Select list. Resources without a color column project a typed NULL so a
/// single row type decodes every table.
pub fn columns(resource: &ResourceSpec) -> &'static str {
    if resource.has_color {
        "id, name, height, weight, avatar, color, revision"
    } else {
        "id, name, height, weight, avatar, NULL::TEXT AS color, revision"
    }
}

pub fn select_all(resource: &ResourceSpec) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY id",
        columns(resource),
        resource.table
    )
}

/// `$1` = id.
pub fn select_by_id(resource: &ResourceSpec) -> String {
    format!(
        "SELECT {} FROM {} WHERE id = $1",
        columns(resource),
        resource.table
    )
}

/// `$1..$4` = name, height, weight, avatar; `$5` = color when present.
pub fn insert(resource: &ResourceSpec) -> String {
    let (names, params) = if resource.has_color {
        ("name, height, weight, avatar, color", "$1, $2, $3, $4, $5")
    } else {
        ("name, height, weight, avatar", "$1, $2, $3, $4")
    };
    format!(
        "INSERT INTO {} ({names}) VALUES ({params}) RETURNING {}",
        resource.table,
        columns(resource)
    )
}

/// `$1` = id, `$2` = expected revision, `$3..$6` = name, height, weight,
/// avatar; `$7` = color when present.
pub fn update_if_revision(resource: &ResourceSpec) -> String {
    let color = if resource.has_color { ", color = $7" } else { "" };
    format!(
        "UPDATE {} SET name = $3, height = $4, weight = $5, avatar = $6{color}, \
         revision = revision + 1 \
         WHERE id = $1 AND revision = $2 \
         RETURNING {}",
        resource.table,
        columns(resource)
    )
}

/// `$1` = id.
pub fn exists(resource: &ResourceSpec) -> String {
    format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)",
        resource.table
    )
}

/// `$1` = id.
pub fn delete(resource: &ResourceSpec) -> String {
    format!("DELETE FROM {} WHERE id = $1", resource.table)
}
