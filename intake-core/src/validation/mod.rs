//! Per-step validation rules.
//!
//! Validators never fail fast: each one walks its whole schema and records a
//! message for every offending field in a [`FieldErrors`] map.

mod deals;
mod shared;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use deals::validate_deal;
pub use shared::{validate_experience, validate_title};

pub const REQUIRED_FIELD: &str = "Required field";
pub const FILE_REQUIRED: &str = "File required";
pub const SUBJECT_TO_REQUIRED: &str = "Required field for Subject-To";
pub const COMPARABLES_REQUIRED: &str = "3 comparables are required when selected";
pub const INVALID_PHONE: &str = "Invalid phone number";
pub const INVALID_EMAIL: &str = "Invalid email address";
pub const INVALID_YEARS: &str = "Invalid years of experience";
pub const INVALID_DEALS: &str = "Invalid number of deals";
pub const EXPLANATION_REQUIRED: &str = "Detailed explanation is required if you have defaulted";

/// Field name → human-readable message, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.0.insert(field.into(), message.into());
    }

    pub fn remove(
        &mut self,
        field: &str,
    ) -> Option<String> {
        self.0.remove(field)
    }

    pub fn get(
        &self,
        field: &str,
    ) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(
        &self,
        field: &str,
    ) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for (field, message) in self.iter() {
            writeln!(f, "  {field}: {message}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn insert_replaces_existing_message() {
        let mut errors = FieldErrors::new();
        errors.insert("apn", REQUIRED_FIELD);
        errors.insert("apn", "APN looks wrong");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("apn"), Some("APN looks wrong"));
    }

    #[test]
    fn fields_are_sorted() {
        let mut errors = FieldErrors::new();
        errors.insert("zoning", REQUIRED_FIELD);
        errors.insert("acreage", REQUIRED_FIELD);

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["acreage", "zoning"]);
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut errors = FieldErrors::new();
        errors.insert("phone", INVALID_PHONE);

        let json = serde_json::to_string(&errors).unwrap();

        assert_eq!(json, r#"{"phone":"Invalid phone number"}"#);
    }
}
