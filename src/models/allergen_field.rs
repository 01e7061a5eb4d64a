//! Allergen declarations as stored on ingredient and recipe records
//!
//! Both a native list and a JSON-encoded string list appear in stored data.

use serde::{Deserialize, Serialize};

/// Allergen field in either of its stored encodings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllergenField {
    /// Already-structured list, e.g. `["milk", "eggs"]`
    List(Vec<String>),
    /// JSON-encoded list, e.g. `"[\"milk\",\"eggs\"]"`
    Encoded(String),
}

impl AllergenField {
    pub fn list<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AllergenField::List(labels.into_iter().map(Into::into).collect())
    }
}
