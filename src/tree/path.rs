//! Dotted path addressing

use crate::error::PathError;
use crate::types::PATH_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A non-empty sequence of key segments locating a value in the data tree
///
/// Segments are never empty and never contain the separator, so a path and
/// its dotted form convert losslessly in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Parse a dotted path such as `"player.hp"`
    pub fn parse(dotted: &str) -> Result<Self, PathError> {
        Self::from_segments(dotted.split(PATH_SEPARATOR))
    }

    /// Build a single-segment path from a top-level key, taken literally
    pub fn key(key: &str) -> Result<Self, PathError> {
        Self::from_segments(std::iter::once(key))
    }

    /// Build a path from individual segments
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PathError::InvalidPath(String::new()));
        }
        for segment in &segments {
            if segment.is_empty() || segment.contains(PATH_SEPARATOR) {
                return Err(PathError::InvalidPath(segments.join(".")));
            }
        }
        Ok(Path { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (always at least one)
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; paths are validated non-empty
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All segments but the last, and the last one
    pub fn split_last(&self) -> (&[String], &str) {
        match self.segments.split_last() {
            Some((last, parents)) => (parents, last.as_str()),
            None => (&[], ""),
        }
    }

    pub fn last(&self) -> &str {
        self.split_last().1
    }

    /// Path of the containing mapping, if any
    pub fn parent(&self) -> Option<Path> {
        let (parents, _) = self.split_last();
        if parents.is_empty() {
            None
        } else {
            Some(Path {
                segments: parents.to_vec(),
            })
        }
    }

    /// Extend this path by one key
    pub fn child(&self, key: &str) -> Result<Path, PathError> {
        if key.is_empty() || key.contains(PATH_SEPARATOR) {
            return Err(PathError::InvalidPath(format!("{}.{}", self, key)));
        }
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Ok(Path { segments })
    }

    /// True when `self` equals `other` or is one of its ancestors
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", PATH_SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl TryFrom<String> for Path {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Path::parse(&value)
    }
}

impl TryFrom<&str> for Path {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Path::parse(value)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.to_string()
    }
}

/// Anything the Mutation API accepts as a path
///
/// Conversion failures are reported like any other resolve failure.
pub trait IntoPath {
    fn into_path(self) -> Result<Path, PathError>;
}

impl IntoPath for Path {
    fn into_path(self) -> Result<Path, PathError> {
        Ok(self)
    }
}

impl IntoPath for &Path {
    fn into_path(self) -> Result<Path, PathError> {
        Ok(self.clone())
    }
}

impl IntoPath for &str {
    fn into_path(self) -> Result<Path, PathError> {
        Path::parse(self)
    }
}

impl IntoPath for String {
    fn into_path(self) -> Result<Path, PathError> {
        Path::parse(&self)
    }
}

impl IntoPath for &String {
    fn into_path(self) -> Result<Path, PathError> {
        Path::parse(self)
    }
}
