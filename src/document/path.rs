//! Slash-delimited document paths
//!
//! A request path such as `node2/list/0` addresses a node inside a document.
//! The empty path addresses the document root. Segments are plain strings;
//! whether one is an object key or an array index is only decided when the
//! node it is applied to is known.

use std::fmt;

use super::errors::{DocumentError, DocumentResult};

/// Ordered list of path segments
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath {
    segments: Vec<String>,
}

impl JsonPath {
    /// The empty path (document root)
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from already-validated segments
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a raw, already URL-decoded request path.
    ///
    /// One leading and one trailing `/` are ignored. `""` and `"/"` give the
    /// root path. Any other empty segment, or a segment containing
    /// whitespace, is rejected with `BadPath`.
    pub fn parse(raw: &str) -> DocumentResult<Self> {
        let trimmed = raw.strip_prefix('/').unwrap_or(raw);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for segment in trimmed.split('/') {
            if segment.is_empty() || segment.chars().any(char::is_whitespace) {
                return Err(DocumentError::BadPath(raw.to_string()));
            }
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Path without its first segment
    pub fn without_first(&self) -> Self {
        Self {
            segments: self.segments.iter().skip(1).cloned().collect(),
        }
    }

    /// Keep at most `depth` leading segments; `0` keeps the whole path.
    pub fn truncated(&self, depth: usize) -> Self {
        if depth == 0 || depth >= self.segments.len() {
            return self.clone();
        }
        Self {
            segments: self.segments[..depth].to_vec(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}
