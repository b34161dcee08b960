//! Data models for HafizLy
//!
//! Defines the core data structures: Link, Category, and LinkDraft.
//! Links live in a remote hosted table; the server assigns identifiers
//! and creation timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Visibility tag for a link
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    Public,
    Private,
}

impl Category {
    /// The opposite category
    pub fn toggled(self) -> Self {
        match self {
            Category::Public => Category::Private,
            Category::Private => Category::Public,
        }
    }

    /// The literal string stored in the remote table
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Public => "Public",
            Category::Private => "Private",
        }
    }

    /// Map the add/edit form's public switch to a category
    pub fn from_public_flag(is_public: bool) -> Self {
        if is_public {
            Category::Public
        } else {
            Category::Private
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A saved link
///
/// Mirrors one row of the remote collection. The URL column is named
/// `link` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    /// Server-assigned identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// The URL
    #[serde(rename = "link")]
    pub url: String,
    /// Visibility tag
    pub category: Category,
    /// Server-assigned creation time; lists order by this, newest first
    pub created_at: DateTime<Utc>,
}

impl Link {
    pub fn is_public(&self) -> bool {
        self.category == Category::Public
    }
}

/// Errors from draft validation
///
/// The messages are shown to the user verbatim, so they read as alerts
/// rather than diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter both name and link")]
    MissingFields,
    #[error("Please enter a valid link starting with http:// or https://")]
    InvalidScheme,
}

/// User input for creating or editing a link
///
/// Raw form state; `validate` trims the fields and checks the invariants
/// before anything is sent to the remote table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDraft {
    pub name: String,
    pub description: String,
    pub url: String,
    pub is_public: bool,
}

impl LinkDraft {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        is_public: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            url: url.into(),
            is_public,
        }
    }

    /// Trim the fields and check them, producing the record to submit
    ///
    /// Rejects an empty name or URL, and a URL without an `http://` or
    /// `https://` prefix. A description that trims to nothing becomes
    /// `None`.
    pub fn validate(&self) -> Result<ValidLink, ValidationError> {
        let name = self.name.trim();
        let url = self.url.trim();

        if name.is_empty() || url.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ValidationError::InvalidScheme);
        }

        let description = self.description.trim();
        Ok(ValidLink {
            name: name.to_string(),
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
            url: url.to_string(),
            category: Category::from_public_flag(self.is_public),
        })
    }
}

/// A draft that passed validation, fields trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLink {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub category: Category,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, url: &str) -> LinkDraft {
        LinkDraft::new(name, "", url, true)
    }

    #[test]
    fn test_category_toggled() {
        assert_eq!(Category::Public.toggled(), Category::Private);
        assert_eq!(Category::Private.toggled(), Category::Public);
        assert_eq!(Category::Public.toggled().toggled(), Category::Public);
    }

    #[test]
    fn test_category_literals() {
        assert_eq!(Category::Public.as_str(), "Public");
        assert_eq!(Category::Private.as_str(), "Private");
        assert_eq!(format!("{}", Category::Private), "Private");
    }

    #[test]
    fn test_category_from_public_flag() {
        assert_eq!(Category::from_public_flag(true), Category::Public);
        assert_eq!(Category::from_public_flag(false), Category::Private);
    }

    #[test]
    fn test_validate_accepts_trimmed_draft() {
        let draft = LinkDraft::new("  Docs  ", "  the manual  ", " https://example.com ", true);
        let valid = draft.validate().unwrap();
        assert_eq!(valid.name, "Docs");
        assert_eq!(valid.description.as_deref(), Some("the manual"));
        assert_eq!(valid.url, "https://example.com");
        assert_eq!(valid.category, Category::Public);
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        assert_eq!(
            draft("", "https://example.com").validate(),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            draft("   ", "https://example.com").validate(),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        assert_eq!(
            draft("Docs", "").validate(),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        assert_eq!(
            draft("Docs", "example.com").validate(),
            Err(ValidationError::InvalidScheme)
        );
        assert_eq!(
            draft("Docs", "ftp://example.com").validate(),
            Err(ValidationError::InvalidScheme)
        );
        // A scheme alone is enough for validation; reachability is not checked
        assert!(draft("Docs", "http://example.com").validate().is_ok());
        assert!(draft("Docs", "https://example.com").validate().is_ok());
    }

    #[test]
    fn test_validate_blank_description_becomes_none() {
        let valid = LinkDraft::new("Docs", "   ", "https://example.com", false)
            .validate()
            .unwrap();
        assert_eq!(valid.description, None);
        assert_eq!(valid.category, Category::Private);
    }

    #[test]
    fn test_link_deserializes_remote_row() {
        let row = serde_json::json!({
            "id": 42,
            "name": "Docs",
            "description": null,
            "link": "https://example.com",
            "category": "Public",
            "created_at": "2025-06-01T12:00:00Z"
        });
        let link: Link = serde_json::from_value(row).unwrap();
        assert_eq!(link.id, 42);
        assert_eq!(link.url, "https://example.com");
        assert_eq!(link.category, Category::Public);
        assert!(link.description.is_none());
        assert!(link.is_public());
    }

    #[test]
    fn test_link_serialization_round_trip() {
        let link = Link {
            id: 7,
            name: "Docs".to_string(),
            description: Some("the manual".to_string()),
            url: "https://example.com".to_string(),
            category: Category::Private,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&link).unwrap();
        assert!(json.contains("\"link\":\"https://example.com\""));
        assert!(json.contains("\"category\":\"Private\""));
        let back: Link = serde_json::from_str(&json).unwrap();
        assert_eq!(link, back);
    }
}
