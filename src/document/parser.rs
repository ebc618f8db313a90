//! YAML decoding into `YamlNode` trees.
//!
//! The decoder listens to the yaml-rust2 event stream rather than using
//! `YamlLoader`, so that scalars keep their exact source text and style and
//! mapping keys keep their document order, duplicates included. Only the first
//! document of a stream is decoded. Aliases stay aliases.
//!
//! Comments and anchor names are not part of the event stream. They are read
//! from the source text in a separate pass and attached by source line:
//!
//! - full-line comments go to the next mapping key or sequence entry (or the
//!   root scalar) as `before` comments;
//! - a comment at the end of a line goes to the first scalar starting on that
//!   line, which for `key: value # note` is the key. Inside a flow collection
//!   it goes to the outermost flow collection;
//! - comments above the first entry that are separated from it by a gap are
//!   the document header, comments after the last entry its trailer.
//!
//! # Example
//!
//! ```
//! use yamlfmt::document::parser::parse_yaml;
//!
//! let doc = parse_yaml("b: 1\na: 2\n").unwrap();
//! let content = doc.content().unwrap();
//! assert_eq!(content.keys(), vec!["b", "a"]);
//! ```

use super::node::{Anchor, Comments, ScalarStyle, YamlNode, YamlScalar, YamlValue};
use super::scan::{scan, Comment, SourceScan};
use std::collections::HashMap;
use thiserror::Error;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};
use yaml_rust2::ScanError;

/// Errors produced while decoding YAML text.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("alias refers to unknown anchor #{0}")]
    UnknownAnchor(usize),
}

/// A container under construction.
struct Frame {
    node: YamlNode,
    pending_key: Option<YamlNode>,
}

struct TreeBuilder {
    source: Vec<char>,
    scan: SourceScan,
    /// Index of the first comment not yet handed out
    next_comment: usize,
    /// Full-line comments waiting for the next entry
    pending: Vec<Comment>,
    first_entry_seen: bool,
    stack: Vec<Frame>,
    anchor_names: HashMap<usize, String>,
    root: Option<YamlNode>,
    document_comments: Comments,
    unknown_anchor: Option<usize>,
}

impl TreeBuilder {
    fn new(text: &str) -> Self {
        Self {
            source: text.chars().collect(),
            scan: scan(text),
            next_comment: 0,
            pending: Vec::new(),
            first_entry_seen: false,
            stack: Vec::new(),
            anchor_names: HashMap::new(),
            root: None,
            document_comments: Comments::default(),
            unknown_anchor: None,
        }
    }

    fn set_anchor(&mut self, node: &mut YamlNode, id: usize) {
        if id == 0 {
            return;
        }
        // ids are handed out in source order, starting at 1
        let name = self
            .scan
            .anchors
            .get(id - 1)
            .cloned()
            .unwrap_or_else(|| format!("a{}", id));
        self.anchor_names.insert(id, name.clone());
        node.anchor = Some(Anchor { id, name });
    }

    /// Whether a node starting now is a mapping key, a block sequence entry or
    /// a root scalar: the places full-line comments are written back.
    fn is_entry(&self, node: &YamlNode) -> bool {
        let Some(parent) = self.stack.last() else {
            return node.flow || !matches!(node.value, YamlValue::Mapping(_) | YamlValue::Sequence(_));
        };
        if parent.node.flow {
            return false;
        }
        match parent.node.value {
            YamlValue::Sequence(_) => true,
            YamlValue::Mapping(_) => parent.pending_key.is_none(),
            _ => false,
        }
    }

    /// Hands the comments that belong to a node starting on `line` to it.
    fn attach_comments(&mut self, node: &mut YamlNode, line: usize) {
        while let Some(comment) = self.scan.comments.get(self.next_comment) {
            if comment.line >= line {
                break;
            }
            self.pending.push(comment.clone());
            self.next_comment += 1;
        }

        if self.is_entry(node) {
            let mut pending = std::mem::take(&mut self.pending);
            if !self.first_entry_seen {
                self.first_entry_seen = true;
                let attached = contiguous_run(&pending, line);
                let attached = pending.split_off(pending.len() - attached);
                self.document_comments.before = pending.into_iter().map(|c| c.text).collect();
                pending = attached;
            }
            node.comments.before = pending.into_iter().map(|c| c.text).collect();
        }

        let inline = match self.scan.comments.get(self.next_comment) {
            Some(comment) if comment.line == line && comment.inline => comment.text.clone(),
            _ => return,
        };
        if let Some(frame) = self.stack.iter_mut().find(|frame| frame.node.flow) {
            frame.node.comments.inline.get_or_insert(inline);
        } else if node.flow || !matches!(node.value, YamlValue::Mapping(_) | YamlValue::Sequence(_)) {
            node.comments.inline = Some(inline);
        } else {
            // a block collection: its first key or entry is on this line
            return;
        }
        self.next_comment += 1;
    }

    fn start_container(&mut self, value: YamlValue, anchor: usize, tag: Option<Tag>, mark: Marker) {
        let mut node = YamlNode::with_tag(value, tag.map(tag_name));
        node.flow = matches!(self.source.get(mark.index()), Some('[' | '{'));
        self.set_anchor(&mut node, anchor);
        self.attach_comments(&mut node, line_of(mark));
        self.stack.push(Frame {
            node,
            pending_key: None,
        });
    }

    fn close_container(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.insert(frame.node);
        }
    }

    /// Attaches a finished node to its parent, or makes it the document content.
    fn insert(&mut self, node: YamlNode) {
        let Some(parent) = self.stack.last_mut() else {
            self.root = Some(node);
            return;
        };

        match &mut parent.node.value {
            YamlValue::Sequence(items) => items.push(Box::new(node)),
            YamlValue::Mapping(pairs) => match parent.pending_key.take() {
                Some(key) => pairs.push((key, node)),
                None => parent.pending_key = Some(node),
            },
            // only containers are ever pushed on the stack
            YamlValue::Document(_) | YamlValue::Scalar(_) | YamlValue::Alias(_) => {}
        }
    }

    /// Builds the document node. Comments nobody claimed become its trailer.
    fn finish(mut self) -> YamlNode {
        let rest = self.scan.comments.split_off(self.next_comment.min(self.scan.comments.len()));
        self.document_comments
            .after
            .extend(self.pending.into_iter().chain(rest).map(|c| c.text));

        let mut document = YamlNode::document(self.root);
        document.comments = self.document_comments;
        document
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        match ev {
            Event::Scalar(value, style, anchor, tag) => {
                let style = scalar_style(style);
                // an empty plain scalar is marked at the token after it
                let positioned = !(value.is_empty() && style == ScalarStyle::Plain);
                let mut node = YamlNode::with_tag(
                    YamlValue::Scalar(YamlScalar { value, style }),
                    tag.map(tag_name),
                );
                self.set_anchor(&mut node, anchor);
                if positioned {
                    self.attach_comments(&mut node, line_of(mark));
                }
                self.insert(node);
            }
            Event::SequenceStart(anchor, tag) => {
                self.start_container(YamlValue::Sequence(Vec::new()), anchor, tag, mark);
            }
            Event::MappingStart(anchor, tag) => {
                self.start_container(YamlValue::Mapping(Vec::new()), anchor, tag, mark);
            }
            Event::SequenceEnd | Event::MappingEnd => self.close_container(),
            Event::Alias(id) => match self.anchor_names.get(&id).cloned() {
                Some(name) => {
                    let mut node = YamlNode::new(YamlValue::Alias(Anchor { id, name }));
                    self.attach_comments(&mut node, line_of(mark));
                    self.insert(node);
                }
                None => self.unknown_anchor = Some(id),
            },
            _ => {}
        }
    }
}

/// Number of comments at the end of `comments` on the lines right above `line`.
fn contiguous_run(comments: &[Comment], line: usize) -> usize {
    let mut expected = line;
    comments
        .iter()
        .rev()
        .take_while(|comment| {
            let adjacent = !comment.inline && comment.line + 1 == expected;
            expected = comment.line;
            adjacent
        })
        .count()
}

/// Zero-based line of a marker.
fn line_of(mark: Marker) -> usize {
    mark.line().saturating_sub(1)
}

fn scalar_style(style: TScalarStyle) -> ScalarStyle {
    match style {
        TScalarStyle::Plain => ScalarStyle::Plain,
        TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
        TScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
        TScalarStyle::Literal => ScalarStyle::Literal,
        _ => ScalarStyle::Folded,
    }
}

fn tag_name(tag: Tag) -> String {
    format!("{}{}", tag.handle, tag.suffix)
}

/// Parses YAML text into a document node.
///
/// The returned node is always a `YamlValue::Document`; its content is `None`
/// when the text holds no document (empty input, comments only).
///
/// # Errors
///
/// Returns `DecodeError::Scan` for malformed YAML.
pub fn parse_yaml(text: &str) -> Result<YamlNode, DecodeError> {
    let mut builder = TreeBuilder::new(text);
    let mut parser = Parser::new_from_str(text);
    parser.load(&mut builder, false)?;

    if let Some(id) = builder.unknown_anchor {
        return Err(DecodeError::UnknownAnchor(id));
    }

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(text: &str) -> YamlNode {
        let doc = parse_yaml(text).unwrap();
        doc.content().cloned().expect("document content")
    }

    #[test]
    fn test_parse_empty_document() {
        let doc = parse_yaml("").unwrap();
        assert!(matches!(doc.value(), YamlValue::Document(None)));
    }

    #[test]
    fn test_parse_mapping_keeps_order() {
        let node = content("z: 1\na: 2\nm: 3\n");
        assert_eq!(node.keys(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parse_duplicate_keys_are_kept() {
        let node = content("a: 1\na: 2\n");
        assert_eq!(node.keys(), vec!["a", "a"]);
    }

    #[test]
    fn test_parse_scalar_styles() {
        let node = content("plain: x\nsingle: 'y'\ndouble: \"z\"\nblock: |\n  text\n");
        let style = |key: &str| match node.get(key).map(|n| n.value()) {
            Some(YamlValue::Scalar(s)) => s.style,
            other => panic!("expected scalar, got {:?}", other),
        };
        assert_eq!(style("plain"), ScalarStyle::Plain);
        assert_eq!(style("single"), ScalarStyle::SingleQuoted);
        assert_eq!(style("double"), ScalarStyle::DoubleQuoted);
        assert_eq!(style("block"), ScalarStyle::Literal);
    }

    #[test]
    fn test_parse_keeps_scalar_text() {
        let node = content("version: 1.10\nhex: 0x1F\n");
        assert_eq!(node.get("version").and_then(|n| n.scalar_text()), Some("1.10"));
        assert_eq!(node.get("hex").and_then(|n| n.scalar_text()), Some("0x1F"));
    }

    #[test]
    fn test_parse_nested_sequence() {
        let node = content("tags:\n  - b\n  - a\n");
        match node.get("tags").map(|n| n.value()) {
            Some(YamlValue::Sequence(items)) => {
                let texts: Vec<_> = items.iter().filter_map(|n| n.scalar_text()).collect();
                assert_eq!(texts, vec!["b", "a"]);
            }
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_alias_is_kept() {
        let node = content("base: &b\n  x: 1\ncopy: *b\n");
        let base = node.get("base").unwrap();
        assert_eq!(
            base.anchor(),
            Some(&Anchor {
                id: 1,
                name: "b".to_string()
            })
        );
        match node.get("copy").map(|n| n.value()) {
            Some(YamlValue::Alias(anchor)) => assert_eq!(anchor.name, "b"),
            other => panic!("expected alias, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_alias_fails() {
        assert!(parse_yaml("copy: *missing\n").is_err());
    }

    #[test]
    fn test_parse_flow_layout() {
        let node = content("list: [a, b]\nmap: {k: v}\nblock:\n  - a\n");
        assert!(node.get("list").unwrap().is_flow());
        assert!(node.get("map").unwrap().is_flow());
        assert!(!node.get("block").unwrap().is_flow());
        assert!(!node.is_flow());
    }

    #[test]
    fn test_parse_empty_value() {
        let node = content("a:\nb: 1\n");
        assert_eq!(node.get("a").and_then(|n| n.scalar_text()), Some(""));
    }

    #[test]
    fn test_parse_comments_attach_to_entries() {
        let doc = parse_yaml("# header\n\n# about a\na: 1 # one\nlist:\n  # first\n  - x\n# end\n").unwrap();
        assert_eq!(doc.comments().before, vec!["# header"]);
        assert_eq!(doc.comments().after, vec!["# end"]);

        let node = doc.content().unwrap();
        let YamlValue::Mapping(pairs) = node.value() else {
            panic!("expected mapping");
        };
        assert_eq!(pairs[0].0.comments().before, vec!["# about a"]);
        assert_eq!(pairs[0].0.comments().inline.as_deref(), Some("# one"));

        let YamlValue::Sequence(items) = pairs[1].1.value() else {
            panic!("expected sequence");
        };
        assert_eq!(items[0].comments().before, vec!["# first"]);
    }

    #[test]
    fn test_parse_nested_comments_go_to_next_key() {
        let node = content("a:\n  x: 1\n  # about b\nb: 2\n");
        let YamlValue::Mapping(pairs) = node.value() else {
            panic!("expected mapping");
        };
        assert_eq!(pairs[1].0.comments().before, vec!["# about b"]);
    }

    #[test]
    fn test_parse_flow_comment_goes_to_collection() {
        let node = content("list: [\n  a, # first\n  b]\n");
        let list = node.get("list").unwrap();
        assert_eq!(list.comments().inline.as_deref(), Some("# first"));
    }

    #[test]
    fn test_parse_tag_is_recorded() {
        let node = content("n: !!str 12\nref: !Ref foo\n");
        assert_eq!(node.get("n").and_then(|n| n.tag()), Some("tag:yaml.org,2002:str"));
        assert_eq!(node.get("ref").and_then(|n| n.tag()), Some("!Ref"));
    }

    #[test]
    fn test_parse_only_first_document() {
        let node = content("a: 1\n---\nb: 2\n");
        assert_eq!(node.keys(), vec!["a"]);
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(parse_yaml("key: [unclosed").is_err());
    }
}
