//! YAML encoding of `YamlNode` trees.
//!
//! The writer walks the tree and writes each node back the way the decoder
//! found it: scalars in their source style and text, flow collections on one
//! line, tags and anchors in front of their node, comments above or after the
//! entry they were attached to. Block collections are indented by two spaces,
//! sequences under a key included.
//!
//! Reordering can move an alias in front of its anchor. The first occurrence
//! written, alias or not, therefore carries the anchor and the node's content,
//! and every later occurrence is written as an alias.

use super::node::{ScalarStyle, YamlNode, YamlScalar, YamlValue};
use std::collections::{HashMap, HashSet};

const INDENT: usize = 2;
const CORE_TAG_PREFIX: &str = "tag:yaml.org,2002:";

/// Serializes a node into YAML text terminated by a newline.
///
/// An empty document without comments encodes to an empty string.
///
/// # Example
///
/// ```
/// use yamlfmt::document::emitter::emit_yaml;
/// use yamlfmt::document::parser::parse_yaml;
///
/// let doc = parse_yaml("b: 1 # one\na: [x, y]\nc:\n- 'z'\n").unwrap();
/// assert_eq!(emit_yaml(&doc), "b: 1 # one\na: [x, y]\nc:\n  - 'z'\n");
/// ```
pub fn emit_yaml(node: &YamlNode) -> String {
    let mut writer = Writer::default();
    writer.collect_anchors(node);

    match node.value() {
        YamlValue::Document(content) => {
            writer.comment_lines(&node.comments.before, 0);
            if let Some(content) = content {
                if !node.comments.before.is_empty() {
                    writer.out.push('\n');
                }
                writer.root(content);
            }
            writer.comment_lines(&node.comments.after, 0);
        }
        _ => writer.root(node),
    }

    writer.out
}

/// Where a node is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Place {
    Root,
    /// After `key:`
    Value,
    /// After `-`
    Item,
}

#[derive(Default)]
struct Writer<'a> {
    out: String,
    anchored: HashMap<usize, &'a YamlNode>,
    written: HashSet<usize>,
}

impl<'a> Writer<'a> {
    fn collect_anchors(&mut self, node: &'a YamlNode) {
        if let Some(anchor) = node.anchor() {
            self.anchored.insert(anchor.id, node);
        }
        match node.value() {
            YamlValue::Document(Some(content)) => self.collect_anchors(content),
            YamlValue::Mapping(pairs) => {
                for (key, value) in pairs {
                    self.collect_anchors(key);
                    self.collect_anchors(value);
                }
            }
            YamlValue::Sequence(items) => {
                for item in items {
                    self.collect_anchors(item);
                }
            }
            _ => {}
        }
    }

    fn pad(&mut self, indent: usize) {
        self.out.extend(std::iter::repeat(' ').take(indent));
    }

    fn comment_lines(&mut self, comments: &[String], indent: usize) {
        for comment in comments {
            self.pad(indent);
            self.out.push_str(comment);
            self.out.push('\n');
        }
    }

    fn end_line(&mut self, comment: Option<&str>) {
        if let Some(comment) = comment {
            self.out.push(' ');
            self.out.push_str(comment);
        }
        self.out.push('\n');
    }

    /// Properties (`!tag &anchor`) and the node whose content is written, or
    /// `*name` and no content when the anchor was already written.
    fn resolve(&mut self, node: &'a YamlNode) -> (String, Option<&'a YamlNode>) {
        let anchor = match node.value() {
            YamlValue::Alias(anchor) => anchor,
            _ => match node.anchor() {
                Some(anchor) if self.written.contains(&anchor.id) => anchor,
                _ => return (self.open(node), Some(node)),
            },
        };

        if !self.written.contains(&anchor.id) {
            if let Some(target) = self.anchored.get(&anchor.id).copied() {
                return (self.open(target), Some(target));
            }
        }
        (format!("*{}", anchor.name), None)
    }

    fn open(&mut self, node: &YamlNode) -> String {
        let mut props = Vec::new();
        if let Some(tag) = node.tag() {
            props.push(tag_text(tag));
        }
        if let Some(anchor) = node.anchor() {
            self.written.insert(anchor.id);
            props.push(format!("&{}", anchor.name));
        }
        props.join(" ")
    }

    fn root(&mut self, node: &'a YamlNode) {
        self.comment_lines(&node.comments.before, 0);
        self.node(node, 0, node.comments.inline.as_deref(), Place::Root);
    }

    /// Writes `node` after its indicator. `indent` is the column of the entry
    /// the node belongs to.
    fn node(&mut self, node: &'a YamlNode, indent: usize, comment: Option<&str>, place: Place) {
        let compact = place == Place::Item && is_compact(node);
        let (props, body) = self.resolve(node);
        let separator = if place == Place::Root { "" } else { " " };
        let child_indent = if place == Place::Root { 0 } else { indent + INDENT };

        let Some(body) = body else {
            self.inline(separator, &props, "");
            self.end_line(comment);
            return;
        };

        match body.value() {
            YamlValue::Mapping(pairs) if !body.flow && !pairs.is_empty() => {
                if compact {
                    self.out.push(' ');
                } else {
                    self.block_header(&props, comment, place);
                }
                self.mapping(pairs, child_indent, compact);
            }
            YamlValue::Sequence(items) if !body.flow && !items.is_empty() => {
                if compact {
                    self.out.push(' ');
                } else {
                    self.block_header(&props, comment, place);
                }
                self.sequence(items, child_indent, compact);
            }
            YamlValue::Scalar(scalar) => match block_scalar(scalar) {
                Some((header, lines)) => {
                    self.inline(separator, &props, &header);
                    self.end_line(comment);
                    for line in lines {
                        if !line.is_empty() {
                            self.pad(indent + INDENT);
                            self.out.push_str(line);
                        }
                        self.out.push('\n');
                    }
                }
                None => {
                    self.inline(separator, &props, &scalar_text(scalar, false));
                    self.end_line(comment);
                }
            },
            _ => {
                let text = self.flow_body(body);
                self.inline(separator, &props, &text);
                self.end_line(comment);
            }
        }
    }

    /// Properties and text on the current line, skipping empty parts.
    fn inline(&mut self, separator: &str, props: &str, text: &str) {
        let line = join(props, text);
        if !line.is_empty() {
            self.out.push_str(separator);
            self.out.push_str(&line);
        }
    }

    /// Line opening a block collection that is not written compactly.
    fn block_header(&mut self, props: &str, comment: Option<&str>, place: Place) {
        match place {
            Place::Root if !props.is_empty() => {
                self.out.push_str("--- ");
                self.out.push_str(props);
                self.end_line(comment);
            }
            Place::Root => {
                if let Some(comment) = comment {
                    self.out.push_str(comment);
                    self.out.push('\n');
                }
            }
            Place::Value | Place::Item => {
                self.inline(" ", props, "");
                self.end_line(comment);
            }
        }
    }

    /// Writes mapping entries at `indent`. With `first_inline` the first key
    /// continues the current line (`- key: value`).
    fn mapping(&mut self, pairs: &'a [(YamlNode, YamlNode)], indent: usize, first_inline: bool) {
        for (index, (key, value)) in pairs.iter().enumerate() {
            if index > 0 || !first_inline {
                self.comment_lines(&key.comments.before, indent);
                self.pad(indent);
            }
            let key_text = self.key(key);
            self.out.push_str(&key_text);
            if key_text.starts_with('*') {
                self.out.push(' ');
            }
            self.out.push(':');

            let comment = key
                .comments
                .inline
                .as_deref()
                .or(value.comments.inline.as_deref());
            self.node(value, indent, comment, Place::Value);
        }
    }

    /// Writes sequence entries at `indent`, the first one on the current line
    /// when `first_inline` is set (`- - item`).
    fn sequence(&mut self, items: &'a [Box<YamlNode>], indent: usize, first_inline: bool) {
        for (index, item) in items.iter().enumerate() {
            if index > 0 || !first_inline {
                self.comment_lines(&item.comments.before, indent);
                self.hoisted_comments(item, indent);
                self.pad(indent);
            }
            self.out.push('-');
            self.node(item, indent, item.comments.inline.as_deref(), Place::Item);
        }
    }

    /// Comments of the first entries of a compact item, which have no line of
    /// their own and are written above the dash.
    fn hoisted_comments(&mut self, node: &YamlNode, indent: usize) {
        if !is_compact(node) {
            return;
        }
        match node.value() {
            YamlValue::Mapping(pairs) => {
                if let Some((key, _)) = pairs.first() {
                    self.comment_lines(&key.comments.before, indent);
                }
            }
            YamlValue::Sequence(items) => {
                if let Some(item) = items.first() {
                    self.comment_lines(&item.comments.before, indent);
                    self.hoisted_comments(item, indent);
                }
            }
            _ => {}
        }
    }

    fn key(&mut self, key: &'a YamlNode) -> String {
        let (props, body) = self.resolve(key);
        let text = match body.map(|body| (body, body.value())) {
            None => return props,
            Some((_, YamlValue::Scalar(scalar))) => scalar_text(scalar, false),
            Some((body, _)) => self.flow_body(body),
        };
        join(&props, &text)
    }

    /// Single-line form of a node, used inside flow collections.
    fn flow(&mut self, node: &'a YamlNode) -> String {
        let (props, body) = self.resolve(node);
        match body {
            Some(body) => {
                let text = self.flow_body(body);
                join(&props, &text)
            }
            None => props,
        }
    }

    fn flow_body(&mut self, body: &'a YamlNode) -> String {
        match body.value() {
            YamlValue::Scalar(scalar) => scalar_text(scalar, true),
            YamlValue::Mapping(pairs) => {
                let entries: Vec<String> = pairs
                    .iter()
                    .map(|(key, value)| {
                        let key = self.flow(key);
                        let value = self.flow(value);
                        let colon = if key.starts_with('*') { " :" } else { ":" };
                        if value.is_empty() {
                            format!("{}{}", key, colon)
                        } else {
                            format!("{}{} {}", key, colon, value)
                        }
                    })
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            YamlValue::Sequence(items) => {
                let entries: Vec<String> = items.iter().map(|item| self.flow(item)).collect();
                format!("[{}]", entries.join(", "))
            }
            YamlValue::Document(_) | YamlValue::Alias(_) => String::new(),
        }
    }
}

fn join(props: &str, text: &str) -> String {
    match (props.is_empty(), text.is_empty()) {
        (true, _) => text.to_string(),
        (false, true) => props.to_string(),
        (false, false) => format!("{} {}", props, text),
    }
}

/// A non-empty block collection with nothing written before its first entry,
/// so the entry can share the line of the enclosing `-`.
fn is_compact(node: &YamlNode) -> bool {
    let block = match node.value() {
        YamlValue::Mapping(pairs) => !pairs.is_empty(),
        YamlValue::Sequence(items) => !items.is_empty(),
        _ => false,
    };
    block
        && !node.flow
        && node.tag.is_none()
        && node.anchor.is_none()
        && node.comments.inline.is_none()
}

fn tag_text(tag: &str) -> String {
    if let Some(suffix) = tag.strip_prefix(CORE_TAG_PREFIX) {
        format!("!!{}", suffix)
    } else if tag.starts_with('!') {
        tag.to_string()
    } else {
        format!("!<{}>", tag)
    }
}

fn has_control(text: &str) -> bool {
    text.chars().any(|c| c.is_control() && c != '\t' && c != '\n')
}

/// Whether `text` reads back as the same plain scalar.
fn fits_plain(text: &str, in_flow: bool) -> bool {
    const INDICATORS: &str = "#&*!|>'\"%@`,[]{}";

    if text.is_empty() {
        return true;
    }
    let indicator_start = text.starts_with(|c: char| INDICATORS.contains(c))
        || ["- ", "? ", ": "].iter().any(|prefix| text.starts_with(prefix))
        || ["-", "?", ":"].contains(&text);

    !indicator_start
        && !text.contains('\n')
        && !text.contains(": ")
        && !text.contains(" #")
        && !text.ends_with(':')
        && !text.starts_with(char::is_whitespace)
        && !text.ends_with(char::is_whitespace)
        && !has_control(text)
        && !(in_flow && text.contains(|c: char| ",[]{}".contains(c)))
}

/// One-line form of a scalar in its source style where that style allows it.
fn scalar_text(scalar: &YamlScalar, in_flow: bool) -> String {
    let text = &scalar.value;
    match scalar.style {
        ScalarStyle::Plain if fits_plain(text, in_flow) => text.clone(),
        ScalarStyle::SingleQuoted if !text.contains('\n') && !has_control(text) => {
            format!("'{}'", text.replace('\'', "''"))
        }
        _ => double_quoted(text),
    }
}

fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{1b}' => out.push_str("\\e"),
            '\u{85}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if c.is_control() || c == '\u{feff}' => {
                let code = u32::from(c);
                if code <= 0xff {
                    out.push_str(&format!("\\x{:02X}", code));
                } else {
                    out.push_str(&format!("\\u{:04X}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Header and body lines of a literal or folded scalar, `None` when the text
/// cannot be written in that style and has to be quoted.
fn block_scalar(scalar: &YamlScalar) -> Option<(String, Vec<&str>)> {
    match scalar.style {
        ScalarStyle::Literal => literal(&scalar.value),
        ScalarStyle::Folded => folded(&scalar.value).or_else(|| literal(&scalar.value)),
        _ => None,
    }
}

/// Chomping indicator for the trailing newlines of `text`, and the text
/// without its final newline.
fn chomp(text: &str) -> (&'static str, &str) {
    let trailing = text.len() - text.trim_end_matches('\n').len();
    let indicator = match trailing {
        0 => "-",
        1 => "",
        _ => "+",
    };
    (indicator, text.strip_suffix('\n').unwrap_or(text))
}

fn literal(text: &str) -> Option<(String, Vec<&str>)> {
    if text.trim_end_matches('\n').is_empty() || has_control(text) {
        return None;
    }
    let (indicator, body) = chomp(text);
    let lines: Vec<&str> = body.split('\n').collect();
    // the first content line sets the indentation
    let first = lines.iter().find(|line| !line.is_empty())?;
    if first.starts_with([' ', '\t']) {
        return None;
    }
    Some((format!("|{}", indicator), lines))
}

/// A folded scalar is written one value line per source line, each followed
/// by an empty line so no two lines fold into one.
fn folded(text: &str) -> Option<(String, Vec<&str>)> {
    let trailing = text.len() - text.trim_end_matches('\n').len();
    if text.trim_end_matches('\n').is_empty()
        || text.starts_with('\n')
        || trailing > 1
        || has_control(text)
    {
        return None;
    }
    let (indicator, body) = chomp(text);
    let pieces: Vec<&str> = body.split('\n').collect();
    if pieces.iter().any(|piece| piece.starts_with([' ', '\t'])) {
        return None;
    }

    let mut lines = Vec::with_capacity(pieces.len() * 2);
    for (index, piece) in pieces.iter().enumerate() {
        lines.push(*piece);
        if !piece.is_empty() && index + 1 < pieces.len() {
            lines.push("");
        }
    }
    Some((format!(">{}", indicator), lines))
}
