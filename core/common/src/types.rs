//! Common types used throughout NoteVeil.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// A path to a file or folder inside the vault.
///
/// Paths are vault-relative (`"Secrets/note.md"`, no leading separator) and
/// stored as segments. Ancestry checks compare whole segments, never raw
/// string prefixes, so `"Secret"` is not an ancestor of `"Secrets/a.md"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NotePath {
    segments: Vec<String>,
}

impl NotePath {
    /// Create a path from segments.
    ///
    /// # Preconditions
    /// - At least one segment
    /// - Segments must be non-empty and free of path separators
    ///
    /// # Errors
    /// - Returns error if the segment list is empty or any segment is invalid
    pub fn from_segments(segments: Vec<String>) -> crate::Result<Self> {
        if segments.is_empty() {
            return Err(crate::Error::InvalidInput(
                "Path must have at least one segment".to_string(),
            ));
        }
        for segment in &segments {
            if segment.is_empty() {
                return Err(crate::Error::InvalidInput(
                    "Path segment cannot be empty".to_string(),
                ));
            }
            if segment.contains('/') || segment.contains('\\') {
                return Err(crate::Error::InvalidInput(
                    "Path segment cannot contain separators".to_string(),
                ));
            }
        }
        Ok(Self { segments })
    }

    /// Parse a path string, splitting on `/`.
    ///
    /// Leading and trailing separators are ignored. Empty paths and paths
    /// with empty segments (`"a//b"`) are rejected.
    pub fn parse(path: &str) -> crate::Result<Self> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Err(crate::Error::InvalidInput(
                "Path cannot be empty".to_string(),
            ));
        }
        let segments: Vec<String> = path.split('/').map(String::from).collect();
        Self::from_segments(segments)
    }

    /// Get the file/folder name (last segment).
    pub fn name(&self) -> &str {
        self.segments
            .last()
            .expect("NotePath always has at least one segment")
    }

    /// Get the parent path, if any.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            None
        } else {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Join this path with a child segment.
    pub fn join(&self, child: &str) -> crate::Result<Self> {
        let mut segments = self.segments.clone();
        segments.push(child.to_string());
        Self::from_segments(segments)
    }

    /// Get the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Iterate over all strict ancestors, nearest first.
    ///
    /// `"a/b/c"` yields `"a/b"`, then `"a"`. A single-segment path yields
    /// nothing.
    pub fn ancestors(&self) -> impl Iterator<Item = NotePath> + '_ {
        (1..self.segments.len()).rev().map(move |len| NotePath {
            segments: self.segments[..len].to_vec(),
        })
    }

    /// Check whether this path is a strict segment-wise ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &NotePath) -> bool {
        self.segments.len() < other.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }
}

impl fmt::Display for NotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl TryFrom<String> for NotePath {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::parse(&value)
    }
}

impl From<NotePath> for String {
    fn from(path: NotePath) -> Self {
        path.to_string()
    }
}

/// Plaintext password wrapper that zeroizes on drop.
///
/// Never logged or serialized; only the digest of a passphrase is ever
/// persisted.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Passphrase(String);

impl Passphrase {
    /// Wrap a plaintext passphrase.
    pub fn new(plaintext: impl Into<String>) -> Self {
        Self(plaintext.into())
    }

    /// Get the plaintext.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Passphrase {
    fn from(plaintext: &str) -> Self {
        Self::new(plaintext)
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Passphrase([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse() {
        let path = NotePath::parse("Secrets/note.md").unwrap();
        assert_eq!(path.segments(), &["Secrets", "note.md"]);
        assert_eq!(path.to_string(), "Secrets/note.md");
    }

    #[test]
    fn test_parse_trims_separators() {
        let path = NotePath::parse("/Secrets/note.md/").unwrap();
        assert_eq!(path.to_string(), "Secrets/note.md");
    }

    #[test]
    fn test_parse_empty_fails() {
        assert!(NotePath::parse("").is_err());
        assert!(NotePath::parse("/").is_err());
        assert!(NotePath::parse("a//b").is_err());
    }

    #[test]
    fn test_name_and_parent() {
        let path = NotePath::parse("a/b/c.md").unwrap();
        assert_eq!(path.name(), "c.md");
        assert_eq!(path.parent().unwrap().to_string(), "a/b");

        let top = NotePath::parse("c.md").unwrap();
        assert!(top.parent().is_none());
    }

    #[test]
    fn test_join() {
        let path = NotePath::parse("a").unwrap().join("b.md").unwrap();
        assert_eq!(path.to_string(), "a/b.md");
        assert!(NotePath::parse("a").unwrap().join("b/c").is_err());
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let path = NotePath::parse("a/b/c").unwrap();
        let ancestors: Vec<String> = path.ancestors().map(|p| p.to_string()).collect();
        assert_eq!(ancestors, vec!["a/b", "a"]);

        assert_eq!(NotePath::parse("a").unwrap().ancestors().count(), 0);
    }

    #[test]
    fn test_is_ancestor_of_is_segment_wise() {
        let folder = NotePath::parse("Secret").unwrap();
        let inside = NotePath::parse("Secret/a.md").unwrap();
        let lookalike = NotePath::parse("Secrets/a.md").unwrap();

        assert!(folder.is_ancestor_of(&inside));
        assert!(!folder.is_ancestor_of(&lookalike));
        assert!(!folder.is_ancestor_of(&folder));
    }

    #[test]
    fn test_serde_string_form() {
        let path = NotePath::parse("a/b.md").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"a/b.md\"");

        let restored: NotePath = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, path);
    }

    #[test]
    fn test_passphrase_debug_redacted() {
        let pass = Passphrase::new("hunter2");
        assert_eq!(format!("{:?}", pass), "Passphrase([REDACTED])");
        assert_eq!(pass.as_str(), "hunter2");
    }

    proptest! {
        #[test]
        fn prop_parse_display_round_trip(
            segments in proptest::collection::vec("[A-Za-z0-9 ._-]{1,12}", 1..5)
        ) {
            let joined = segments.join("/");
            let path = NotePath::parse(&joined).unwrap();
            prop_assert_eq!(path.to_string(), joined);
            prop_assert_eq!(path.segments().len(), segments.len());
            prop_assert_eq!(path.ancestors().count(), segments.len() - 1);
        }

        #[test]
        fn prop_ancestors_cover_exactly_prefixes(
            segments in proptest::collection::vec("[a-z]{1,6}", 2..6)
        ) {
            let path = NotePath::from_segments(segments).unwrap();
            for ancestor in path.ancestors() {
                prop_assert!(ancestor.is_ancestor_of(&path));
            }
        }
    }
}
