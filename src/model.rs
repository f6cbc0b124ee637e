//! Gallery data model.
//!
//! The collection of [`ImageRecord`]s is the only entity the gallery has.
//! Records are serialized with the field names the browser gallery has
//! always written (`src`, `size`, `date`), so existing saved data keeps loading.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Unique identifier for an image record.
///
/// New ids are random UUIDs. Older saved galleries used numeric ids
/// (a timestamp plus a random fraction); those load as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    /// Generate a fresh id, unique for the session.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ImageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for ImageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// One stored image plus its metadata and caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Join key between the store and the rendered card
    pub id: ImageId,
    /// Encoded payload as a data URI
    #[serde(rename = "src")]
    pub data: String,
    /// Original file name (display only, not unique)
    pub name: String,
    /// Formatted byte size, computed once at ingestion
    #[serde(rename = "size")]
    pub size_label: String,
    /// User-editable caption
    #[serde(default)]
    pub caption: String,
    /// Localized creation date
    #[serde(rename = "date")]
    pub date_label: String,
}

impl ImageRecord {
    /// Create a record with a fresh id and an empty caption.
    pub fn new(
        data: impl Into<String>,
        name: impl Into<String>,
        size_label: impl Into<String>,
        date_label: impl Into<String>,
    ) -> Self {
        Self::with_id(ImageId::generate(), data, name, size_label, date_label)
    }

    /// Create a record with a specific id and an empty caption.
    pub fn with_id(
        id: ImageId,
        data: impl Into<String>,
        name: impl Into<String>,
        size_label: impl Into<String>,
        date_label: impl Into<String>,
    ) -> Self {
        Self {
            id,
            data: data.into(),
            name: name.into(),
            size_label: size_label.into(),
            caption: String::new(),
            date_label: date_label.into(),
        }
    }
}
