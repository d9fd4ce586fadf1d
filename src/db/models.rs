use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Visibility of a document.
///
/// Stored as a plain string. Values other than `public` and `restricted` are
/// kept as-is in `Other` so they survive a round trip through the database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Privacy {
    /// Visible to every authenticated user.
    Public,
    /// Visible to the owner only.
    Restricted,
    /// Any other stored value. Currently visible to everybody.
    Other(String),
}

impl Privacy {
    pub fn as_str(&self) -> &str {
        match self {
            Privacy::Public => "public",
            Privacy::Restricted => "restricted",
            Privacy::Other(value) => value,
        }
    }
}

impl From<String> for Privacy {
    fn from(value: String) -> Self {
        match value.as_str() {
            "public" => Privacy::Public,
            "restricted" => Privacy::Restricted,
            _ => Privacy::Other(value),
        }
    }
}

impl From<&str> for Privacy {
    fn from(value: &str) -> Self {
        Privacy::from(value.to_string())
    }
}

impl From<Privacy> for String {
    fn from(privacy: Privacy) -> Self {
        match privacy {
            Privacy::Other(value) => value,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document stored in the `documents` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub content: String,
    pub privacy: Privacy,
    /// Id of the owning user. Always set from the authenticated user.
    pub owner_id: i64,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Whether `user_id` may open this document.
    ///
    /// Only `restricted` documents are hidden from non-owners; every other
    /// privacy value is allowed.
    pub fn is_viewable_by(&self, user_id: i64) -> bool {
        self.privacy != Privacy::Restricted || self.owner_id == user_id
    }

    /// Whether this document belongs in `user_id`'s document list.
    pub fn is_listed_for(&self, user_id: i64) -> bool {
        self.owner_id == user_id || self.privacy == Privacy::Public
    }
}

/// Fields required to insert a document. Id and timestamp are assigned by
/// the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub name: String,
    pub content: String,
    pub privacy: Privacy,
    pub owner_id: i64,
}

/// A local user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: i64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// External workplace identity, set once the account is linked.
    #[serde(default)]
    pub workplace_id: Option<String>,
}

/// A workplace community. Read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(privacy: &str, owner_id: i64) -> Document {
        Document {
            id: 1,
            name: "Doc".to_string(),
            content: "Body".to_string(),
            privacy: Privacy::from(privacy),
            owner_id,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_privacy_parsing() {
        assert_eq!(Privacy::from("public"), Privacy::Public);
        assert_eq!(Privacy::from("restricted"), Privacy::Restricted);
        assert_eq!(
            Privacy::from("team-only"),
            Privacy::Other("team-only".to_string())
        );
    }

    #[test]
    fn test_privacy_keeps_unknown_values() {
        let json = serde_json::to_string(&Privacy::from("Secret")).unwrap();
        assert_eq!(json, "\"Secret\"");
        let back: Privacy = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "Secret");
    }

    #[test]
    fn test_privacy_is_case_sensitive() {
        assert_eq!(Privacy::from("Restricted"), Privacy::Other("Restricted".into()));
    }

    #[test]
    fn test_restricted_only_viewable_by_owner() {
        let d = doc("restricted", 5);
        assert!(d.is_viewable_by(5));
        assert!(!d.is_viewable_by(7));
    }

    #[test]
    fn test_public_and_unknown_viewable_by_anyone() {
        assert!(doc("public", 5).is_viewable_by(7));
        assert!(doc("friends", 5).is_viewable_by(7));
        assert!(doc("", 5).is_viewable_by(7));
    }

    #[test]
    fn test_listing_rule() {
        assert!(doc("public", 5).is_listed_for(7));
        assert!(doc("restricted", 7).is_listed_for(7));
        assert!(!doc("restricted", 5).is_listed_for(7));
        // Unknown values are viewable but not listed to non-owners.
        assert!(!doc("friends", 5).is_listed_for(7));
    }

    #[test]
    fn test_user_defaults() {
        let user: User = serde_json::from_str(r#"{ "_id": 3 }"#).unwrap();
        assert_eq!(user.id, 3);
        assert!(user.name.is_empty());
        assert_eq!(user.workplace_id, None);
    }
}
