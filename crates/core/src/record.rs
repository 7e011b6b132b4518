//! Record model, request payloads, and the update merge.
//!
//! Measures (`height`, `weight`) arrive either as JSON numbers or as numeric
//! strings (`"0.4"`); both are normalised to `f64` at the boundary so the
//! rest of the system only ever sees finite numbers.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::resource::ResourceSpec;
use crate::types::{DbId, Revision};

/// One stored row of a resource table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub resource: &'static ResourceSpec,
    pub id: DbId,
    pub name: String,
    pub height: f64,
    pub weight: f64,
    pub avatar: String,
    pub color: Option<String>,
    /// Internal concurrency counter; never serialised.
    pub revision: Revision,
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.resource.has_color { 6 } else { 5 };
        let mut state = serializer.serialize_struct("Record", fields)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("height", &self.height)?;
        state.serialize_field("weight", &self.weight)?;
        state.serialize_field("avatar", &self.avatar)?;
        if self.resource.has_color {
            state.serialize_field("color", &self.color)?;
        }
        state.end()
    }
}

/// Payload for creating a record.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct NewRecord {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(deserialize_with = "measure")]
    #[validate(range(min = 0.0))]
    pub height: f64,
    #[serde(deserialize_with = "measure")]
    #[validate(range(min = 0.0))]
    pub weight: f64,
    #[validate(length(min = 1, max = 2048))]
    pub avatar: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub color: Option<String>,
}

impl NewRecord {
    /// Validate field values and check the payload fits `resource`'s columns.
    pub fn check(&self, resource: &ResourceSpec) -> Result<(), CoreError> {
        self.validate()?;
        if self.color.is_some() && !resource.has_color {
            return Err(CoreError::Validation(format!(
                "{} records have no color field",
                resource.singular
            )));
        }
        Ok(())
    }
}

impl From<&Record> for NewRecord {
    fn from(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            height: record.height,
            weight: record.weight,
            avatar: record.avatar.clone(),
            color: record.color.clone(),
        }
    }
}

/// Partial payload for updating a record. Absent fields keep their stored
/// value. An explicit `null` clears `color`; for the other fields it is
/// treated the same as an absent field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecordPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_measure")]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "optional_measure")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub color: Option<Option<String>>,
}

impl Record {
    /// Build the record a store returns for a freshly inserted row.
    pub fn from_new(resource: &'static ResourceSpec, id: DbId, input: NewRecord) -> Self {
        Self {
            resource,
            id,
            name: input.name,
            height: input.height,
            weight: input.weight,
            avatar: input.avatar,
            color: input.color,
            revision: 1,
        }
    }

    /// Right-biased shallow merge of `patch` over this record.
    ///
    /// The identifier and revision are carried over unchanged. The merged
    /// record is validated as a whole before being returned.
    pub fn merge(&self, patch: &RecordPatch) -> Result<Record, CoreError> {
        if matches!(patch.color, Some(Some(_))) && !self.resource.has_color {
            return Err(CoreError::Validation(format!(
                "{} records have no color field",
                self.resource.singular
            )));
        }

        let merged = Record {
            resource: self.resource,
            id: self.id,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            height: patch.height.unwrap_or(self.height),
            weight: patch.weight.unwrap_or(self.weight),
            avatar: patch.avatar.clone().unwrap_or_else(|| self.avatar.clone()),
            color: match &patch.color {
                Some(color) => color.clone(),
                None => self.color.clone(),
            },
            revision: self.revision,
        };

        NewRecord::from(&merged).check(self.resource)?;
        Ok(merged)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Measure {
    Number(f64),
    Text(String),
}

impl Measure {
    fn into_f64<E: de::Error>(self) -> Result<f64, E> {
        let value = match self {
            Measure::Number(n) => n,
            Measure::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("expected a number, got {text:?}")))?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(E::custom("number must be finite"))
        }
    }
}

fn measure<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Measure::deserialize(deserializer)?.into_f64()
}

fn optional_measure<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Option::<Measure>::deserialize(deserializer)?
        .map(Measure::into_f64)
        .transpose()
}

/// Distinguishes `"field": null` (`Some(None)`) from an absent field (`None`,
/// via `#[serde(default)]`).
fn nullable<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<String>>, D::Error> {
    Option::<String>::deserialize(deserializer).map(Some)
}
