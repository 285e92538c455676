//! Field path value objects

use crate::error::FormError;
use std::fmt;
use std::str::FromStr;

/// One step of a field path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Numeric segment. Addresses an array slot, or an object key when the
    /// parent already is an object.
    Index(usize),
}

impl PathSegment {
    fn parse(raw: &str) -> Self {
        match raw.parse::<usize>() {
            // Leading zeros ("01") stay keys so they round-trip unchanged
            Ok(index) if index.to_string() == raw => PathSegment::Index(index),
            _ => PathSegment::Key(raw.to_string()),
        }
    }

    /// The segment as an object key
    pub fn as_key(&self) -> String {
        match self {
            PathSegment::Key(key) => key.clone(),
            PathSegment::Index(index) => index.to_string(),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A parsed field path such as `spec.ports.0.name` or `spec.ports[0].name`.
///
/// The empty path addresses the root of the value tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Parse a dot/bracket-delimited path
    pub fn parse(path: &str) -> Result<Self, FormError> {
        let invalid = |reason| FormError::InvalidPath {
            path: path.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        if path.is_empty() {
            return Ok(Self { segments });
        }

        for part in path.split('.') {
            let (head, mut rest) = match part.find('[') {
                Some(pos) => part.split_at(pos),
                None => (part, ""),
            };
            if head.is_empty() && rest.is_empty() {
                return Err(invalid("empty segment"));
            }
            if head.contains(']') {
                return Err(invalid("unbalanced `]`"));
            }
            // A leading "[0]" addresses a root-level array; anywhere else a
            // bracket has to follow a key ("a.[0]" is rejected).
            if !head.is_empty() {
                segments.push(PathSegment::parse(head));
            } else if !segments.is_empty() {
                return Err(invalid("bracket index must follow a key"));
            }

            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(|| invalid("unclosed `[`"))?;
                let inner = &rest[1..close];
                let index = inner
                    .parse::<usize>()
                    .map_err(|_| invalid("bracket index must be a non-negative integer"))?;
                segments.push(PathSegment::Index(index));
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(invalid("unexpected text after `]`"));
                }
            }
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromStr for FieldPath {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Canonical dotted form, so `a[0].b` displays as `a.0.b`
impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
