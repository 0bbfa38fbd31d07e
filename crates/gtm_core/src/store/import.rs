//! Import payload validation.
//!
//! The check is structural: every collection key must be present as an
//! array and `settings` must be an object. Field-level content is only
//! checked as far as decoding into typed records requires; records missing
//! optional text or list fields decode with those fields empty.

use crate::model::document::{Document, COLLECTION_KEYS, SETTINGS_KEY};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why an import payload was rejected.
#[derive(Debug)]
pub enum ImportError {
    InvalidJson(serde_json::Error),
    NotAnObject,
    MissingCollection(&'static str),
    MissingSettings,
    Decode(serde_json::Error),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(err) => write!(f, "payload is not valid JSON: {err}"),
            Self::NotAnObject => write!(f, "payload root must be a JSON object"),
            Self::MissingCollection(key) => {
                write!(f, "collection `{key}` is missing or not an array")
            }
            Self::MissingSettings => write!(f, "`{SETTINGS_KEY}` is missing or not an object"),
            Self::Decode(err) => write!(f, "payload does not match document records: {err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidJson(err) | Self::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl ImportError {
    /// Stable code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidJson(_) => "invalid_json",
            Self::NotAnObject => "not_an_object",
            Self::MissingCollection(_) => "missing_collection",
            Self::MissingSettings => "missing_settings",
            Self::Decode(_) => "decode_failed",
        }
    }
}

/// Validates and decodes an exported document.
pub fn parse_import(json: &str) -> Result<Document, ImportError> {
    let value: Value = serde_json::from_str(json).map_err(ImportError::InvalidJson)?;
    let root = value.as_object().ok_or(ImportError::NotAnObject)?;

    for key in COLLECTION_KEYS {
        if !root.get(key).is_some_and(Value::is_array) {
            return Err(ImportError::MissingCollection(key));
        }
    }
    if !root.get(SETTINGS_KEY).is_some_and(Value::is_object) {
        return Err(ImportError::MissingSettings);
    }

    serde_json::from_value(value).map_err(ImportError::Decode)
}

#[cfg(test)]
mod tests {
    use super::{parse_import, ImportError};

    const EMPTY_DOC: &str = r#"{
        "applications": [],
        "stories": [],
        "mockInterviews": [],
        "drills": [],
        "networkingContacts": [],
        "dailyRhythm": [],
        "settings": {
            "startDate": "2024-01-01",
            "weeklyTargets": {"applications": 5, "mockInterviews": 2, "drills": 5, "networking": 5}
        }
    }"#;

    #[test]
    fn accepts_complete_empty_document() {
        let doc = parse_import(EMPTY_DOC).unwrap();
        assert!(doc.applications.is_empty());
        assert_eq!(doc.settings.weekly_targets.applications, 5);
    }

    #[test]
    fn rejects_structural_problems_with_specific_reason() {
        assert!(matches!(
            parse_import("not json"),
            Err(ImportError::InvalidJson(_))
        ));
        assert!(matches!(parse_import("[]"), Err(ImportError::NotAnObject)));

        let stories_not_array = EMPTY_DOC.replace(r#""stories": []"#, r#""stories": {}"#);
        assert!(matches!(
            parse_import(&stories_not_array),
            Err(ImportError::MissingCollection("stories"))
        ));

        let no_settings = r#"{"applications": [], "stories": [], "mockInterviews": [],
            "drills": [], "networkingContacts": [], "dailyRhythm": [], "settings": 3}"#;
        let err = parse_import(no_settings).unwrap_err();
        assert_eq!(err.code(), "missing_settings");
    }

    #[test]
    fn rejects_records_that_cannot_be_decoded() {
        let bad_record = EMPTY_DOC.replace(
            r#""applications": []"#,
            r#""applications": [{"id": 1}]"#,
        );
        assert!(matches!(
            parse_import(&bad_record),
            Err(ImportError::Decode(_))
        ));
    }
}
