//! Strongly-typed revision id wrapper.

use crate::error::{CoreError, CoreResult};
use crate::sql_utils::is_plain_identifier;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Maximum length of a revision id; matches the width of the version table
/// column.
pub const MAX_REVISION_ID_LEN: usize = 32;

/// Identifier of a single revision in the history.
///
/// Revision ids are written verbatim into the version table, so they are
/// restricted to plain identifier characters (`[A-Za-z0-9_]`) and at most
/// [`MAX_REVISION_ID_LEN`] bytes. Unlike table names they may start with a
/// digit (`3c7e1f9a2b40` is a valid id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RevisionId(String);

impl RevisionId {
    /// Create a new `RevisionId`, panicking in debug builds if the id is invalid.
    ///
    /// Prefer [`parse`](Self::parse) when handling untrusted input.
    pub fn new(id: impl Into<String>) -> Self {
        let s = id.into();
        debug_assert!(Self::validate(&s).is_ok(), "invalid RevisionId: {s}");
        Self(s)
    }

    /// Parse and validate a revision id.
    pub fn parse(id: impl Into<String>) -> CoreResult<Self> {
        let s = id.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    fn validate(s: &str) -> CoreResult<()> {
        let reason = if s.is_empty() {
            "must not be empty"
        } else if s.len() > MAX_REVISION_ID_LEN {
            "longer than 32 characters"
        } else if !is_plain_identifier(&format!("r{s}")) {
            "only ASCII letters, digits and '_' are allowed"
        } else {
            return Ok(());
        };
        Err(CoreError::InvalidRevisionId {
            id: s.to_string(),
            reason: reason.to_string(),
        })
    }

    /// Return the underlying id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RevisionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for RevisionId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RevisionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RevisionId {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for RevisionId {
    type Error = CoreError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<RevisionId> for String {
    fn from(id: RevisionId) -> Self {
        id.0
    }
}

impl PartialEq<str> for RevisionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RevisionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_id() {
        let id = RevisionId::parse("3c7e1f9a2b40").unwrap();
        assert_eq!(id.as_str(), "3c7e1f9a2b40");
        assert_eq!(id, "3c7e1f9a2b40");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            RevisionId::parse(""),
            Err(CoreError::InvalidRevisionId { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_quotes() {
        assert!(RevisionId::parse("abc'; DROP TABLE users; --").is_err());
        assert!(RevisionId::parse("with space").is_err());
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = "a".repeat(MAX_REVISION_ID_LEN + 1);
        assert!(RevisionId::parse(long).is_err());
        assert!(RevisionId::parse("a".repeat(MAX_REVISION_ID_LEN)).is_ok());
    }

    #[test]
    fn test_display_and_deref() {
        let id = RevisionId::new("8d41b6e0c2f5");
        assert_eq!(format!("{id}"), "8d41b6e0c2f5");
        assert!(id.starts_with("8d4"));
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let ok: RevisionId = serde_json::from_str(r#""e5a09c3d7b18""#).unwrap();
        assert_eq!(ok, "e5a09c3d7b18");
        assert!(serde_json::from_str::<RevisionId>(r#""bad id""#).is_err());
    }

    #[test]
    fn test_borrow_lookup() {
        use std::collections::HashMap;
        let mut map: HashMap<RevisionId, i32> = HashMap::new();
        map.insert(RevisionId::new("abc123"), 1);
        assert_eq!(map.get("abc123"), Some(&1));
    }
}
