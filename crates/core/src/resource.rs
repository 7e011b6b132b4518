//! Static descriptors for the resources the service exposes.
//!
//! Every resource is served by the same generic handler set; a
//! [`ResourceSpec`] tells that handler set which table to hit, which
//! columns exist, and how to phrase envelope messages.

use crate::error::CoreError;
use crate::types::DbId;

/// Describes one table-backed resource.
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceSpec {
    /// URL path segment, e.g. `fashion` for `/fashion/{id}`.
    pub path: &'static str,
    /// Backing table. Only ever formatted into SQL from this constant.
    pub table: &'static str,
    /// Capitalised name used in messages ("Fashion").
    pub singular: &'static str,
    /// Plural used by the list message ("fashions").
    pub plural: &'static str,
    /// Whether rows carry the nullable `color` column.
    pub has_color: bool,
}

pub static FASHION: ResourceSpec = ResourceSpec {
    path: "fashion",
    table: "fashion_tb",
    singular: "Fashion",
    plural: "fashions",
    has_color: true,
};

pub static POKEMON: ResourceSpec = ResourceSpec {
    path: "pokemon",
    table: "pokemon_tb",
    singular: "Pokemon",
    plural: "pokemons",
    has_color: false,
};

static ALL: [&ResourceSpec; 2] = [&FASHION, &POKEMON];

impl ResourceSpec {
    /// Every registered resource, in mount order.
    pub fn all() -> &'static [&'static ResourceSpec] {
        &ALL
    }

    pub fn not_found(&self, id: DbId) -> CoreError {
        CoreError::NotFound {
            entity: self.singular,
            id,
        }
    }

    pub fn listed_message(&self) -> String {
        format!("All {} successfully retrieved.", self.plural)
    }

    pub fn retrieved_message(&self, name: &str) -> String {
        format!("{} {name} successfully retrieved.", self.singular)
    }

    pub fn added_message(&self, name: &str) -> String {
        format!("{} {name} successfully added.", self.singular)
    }

    pub fn updated_message(&self, name: &str) -> String {
        format!("{} {name} has been successfully updated.", self.singular)
    }

    pub fn deleted_message(&self, id: DbId) -> String {
        format!("{} with id: {id} successfully deleted.", self.singular)
    }
}
