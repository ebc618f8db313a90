//! YAML node representation used by the ordering engine.
//!
//! A decoded document is a tree of `YamlNode`s. Every node wraps a `YamlValue`
//! (document, mapping, sequence, scalar or alias) plus the metadata the
//! decoder saw: tag, anchor, flow layout and the comments around it. The
//! ordering engine only ever permutes children in place: nodes are moved,
//! never rebuilt, so their metadata travels with them.
//!
//! # Example
//!
//! ```
//! use yamlfmt::document::node::{YamlNode, YamlValue};
//!
//! let mut map = YamlNode::mapping(vec![
//!     (YamlNode::plain("b"), YamlNode::plain("2")),
//!     (YamlNode::plain("a"), YamlNode::plain("1")),
//! ]);
//! assert_eq!(map.keys(), vec!["b", "a"]);
//!
//! if let YamlValue::Mapping(pairs) = map.value_mut() {
//!     pairs.reverse();
//! }
//! assert_eq!(map.keys(), vec!["a", "b"]);
//! ```

/// Presentation style of a scalar as found in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl ScalarStyle {
    /// Returns true for styles that force the scalar to be read as a string.
    pub fn is_quoted(&self) -> bool {
        !matches!(self, ScalarStyle::Plain)
    }
}

/// A scalar leaf: its source text and the style it was written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamlScalar {
    pub value: String,
    pub style: ScalarStyle,
}

impl YamlScalar {
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for YamlScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// An anchor as written in the source (`&name`).
///
/// `id` is unique within a document even when a name is reused, aliases refer
/// to the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub id: usize,
    pub name: String,
}

/// Comments attached to a node. The texts include the leading `#`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
    /// Full-line comments written above the node
    pub before: Vec<String>,
    /// Comment at the end of the node's first line
    pub inline: Option<String>,
    /// Trailing comments, only used on documents
    pub after: Vec<String>,
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.inline.is_none() && self.after.is_empty()
    }
}

/// The closed set of node kinds.
///
/// Mappings keep their entries as `(key, value)` pairs in document order.
/// Keys are nodes themselves (conventionally scalars) and duplicates are kept
/// as they were decoded. Sequence elements are boxed so each one keeps its
/// address while the sequence is reordered.
#[allow(clippy::vec_box)]
#[derive(Debug, Clone, PartialEq)]
pub enum YamlValue {
    /// Wraps the content node of a document, `None` for an empty document
    Document(Option<Box<YamlNode>>),
    /// Ordered key/value pairs
    Mapping(Vec<(YamlNode, YamlNode)>),
    /// Ordered elements
    Sequence(Vec<Box<YamlNode>>),
    /// Leaf value
    Scalar(YamlScalar),
    /// Reference to an anchored node (`*name`), kept unexpanded
    Alias(Anchor),
}

/// A YAML value together with the metadata attached to it by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlNode {
    pub(crate) value: YamlValue,
    pub(crate) tag: Option<String>,
    pub(crate) anchor: Option<Anchor>,
    pub(crate) comments: Comments,
    /// Mapping or sequence written in flow style (`{...}`, `[...]`)
    pub(crate) flow: bool,
}

impl YamlNode {
    /// Creates an untagged node with the given value.
    pub fn new(value: YamlValue) -> Self {
        Self {
            value,
            tag: None,
            anchor: None,
            comments: Comments::default(),
            flow: false,
        }
    }

    /// Creates a node carrying a tag such as `tag:yaml.org,2002:str`.
    pub fn with_tag(value: YamlValue, tag: Option<String>) -> Self {
        Self {
            tag,
            ..Self::new(value)
        }
    }

    /// Creates a document node wrapping `content`.
    pub fn document(content: Option<YamlNode>) -> Self {
        Self::new(YamlValue::Document(content.map(Box::new)))
    }

    /// Creates a mapping node from `(key, value)` pairs.
    pub fn mapping(pairs: Vec<(YamlNode, YamlNode)>) -> Self {
        Self::new(YamlValue::Mapping(pairs))
    }

    /// Creates a sequence node.
    pub fn sequence(items: Vec<YamlNode>) -> Self {
        Self::new(YamlValue::Sequence(items.into_iter().map(Box::new).collect()))
    }

    /// Creates a scalar node with the given style.
    pub fn scalar(value: impl Into<String>, style: ScalarStyle) -> Self {
        Self::new(YamlValue::Scalar(YamlScalar {
            value: value.into(),
            style,
        }))
    }

    /// Creates a plain scalar node.
    pub fn plain(value: impl Into<String>) -> Self {
        Self::scalar(value, ScalarStyle::Plain)
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchor.as_ref()
    }

    pub fn comments(&self) -> &Comments {
        &self.comments
    }

    pub fn is_flow(&self) -> bool {
        self.flow
    }

    pub fn value(&self) -> &YamlValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut YamlValue {
        &mut self.value
    }

    /// Returns the scalar text, or `None` for non-scalar nodes.
    ///
    /// ```
    /// use yamlfmt::document::node::YamlNode;
    ///
    /// assert_eq!(YamlNode::plain("x").scalar_text(), Some("x"));
    /// assert_eq!(YamlNode::sequence(vec![]).scalar_text(), None);
    /// ```
    pub fn scalar_text(&self) -> Option<&str> {
        match &self.value {
            YamlValue::Scalar(scalar) => Some(scalar.as_str()),
            _ => None,
        }
    }

    /// Number of direct children: pairs for a mapping, elements for a sequence.
    pub fn len(&self) -> usize {
        match &self.value {
            YamlValue::Document(content) => usize::from(content.is_some()),
            YamlValue::Mapping(pairs) => pairs.len(),
            YamlValue::Sequence(items) => items.len(),
            YamlValue::Scalar(_) | YamlValue::Alias(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Key texts of a mapping in their current order. Non-scalar keys show as "".
    pub fn keys(&self) -> Vec<&str> {
        match &self.value {
            YamlValue::Mapping(pairs) => pairs
                .iter()
                .map(|(key, _)| key.scalar_text().unwrap_or_default())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Looks up the value stored under `key` in a mapping (first match wins).
    pub fn get(&self, key: &str) -> Option<&YamlNode> {
        match &self.value {
            YamlValue::Mapping(pairs) => pairs
                .iter()
                .find(|(k, _)| k.scalar_text() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the content of a document node, or the node itself otherwise.
    pub fn content(&self) -> Option<&YamlNode> {
        match &self.value {
            YamlValue::Document(content) => content.as_deref(),
            _ => Some(self),
        }
    }
}
