//! Typed path segments.

use std::fmt;

pub(crate) const ROOT: &str = "$";
pub(crate) const WILDCARD: &str = "*";

/// A segment in a rule or candidate path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Document root (`$`)
    Root,
    /// Named mapping key (`.key`)
    Key(String),
    /// Sequence position (`[0]`), kept as written
    Index(String),
    /// Any single key (`.*`)
    KeyWildcard,
    /// Any single child (`[*]`)
    IndexWildcard,
}

impl PathSegment {
    /// Classifies a token produced by the tokenizer.
    ///
    /// A leading token without delimiter is a bare key (`schema` in
    /// `schema.properties`), or the key wildcard when it is `*`.
    pub fn from_token(token: &str) -> Self {
        if token == ROOT {
            return PathSegment::Root;
        }

        if let Some(inner) = token.strip_prefix('[') {
            let inner = inner.strip_suffix(']').unwrap_or(inner);
            return if inner == WILDCARD {
                PathSegment::IndexWildcard
            } else {
                PathSegment::Index(inner.to_string())
            };
        }

        let name = token.strip_prefix('.').unwrap_or(token);
        if name == WILDCARD {
            PathSegment::KeyWildcard
        } else {
            PathSegment::Key(name.to_string())
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Root => write!(f, "{}", ROOT),
            PathSegment::Key(name) => write!(f, ".{}", name),
            PathSegment::Index(index) => write!(f, "[{}]", index),
            PathSegment::KeyWildcard => write!(f, ".{}", WILDCARD),
            PathSegment::IndexWildcard => write!(f, "[{}]", WILDCARD),
        }
    }
}

/// A parsed path: a rule pattern or the location of a node in a document.
///
/// Paths beginning with `$` are absolute; any other non-empty path is
/// relative and is matched against the tail of a candidate path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct YamlPath {
    /// Segments that make up the path.
    pub segments: Vec<PathSegment>,
}

impl YamlPath {
    /// Creates a new path with the given segments.
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// The path of the document content (`$`).
    pub fn root() -> Self {
        Self::new(vec![PathSegment::Root])
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when the path does not start at the document root.
    pub fn is_relative(&self) -> bool {
        !matches!(self.segments.first(), None | Some(PathSegment::Root))
    }

    /// True for the bare root path `$`.
    pub fn is_root(&self) -> bool {
        self.segments == [PathSegment::Root]
    }

    /// Path of the value stored under `key` below this path.
    pub fn child_key(&self, key: &str) -> Self {
        self.child(PathSegment::Key(key.to_string()))
    }

    /// Path of the element at `index` below this path.
    pub fn child_index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index.to_string()))
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for YamlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
