//! Ordering functions that rules attach to matched nodes.
//!
//! Both functions only move existing children around: keys keep their
//! values and no node is created or dropped.

use super::rule::OrderFn;
use crate::document::node::{YamlNode, YamlValue};
use indexmap::IndexSet;
use std::sync::Arc;

/// Sorts a mapping by key text or a sequence by element text, byte-wise.
///
/// The sort is stable. Non-scalar keys and elements (aliases included) compare
/// as the empty string. Any other node is left alone.
pub fn sort_lexicographic(_path: &str, node: &mut YamlNode) {
    match node.value_mut() {
        YamlValue::Sequence(items) => {
            items.sort_by(|a, b| sort_text(a).cmp(sort_text(b)));
        }
        YamlValue::Mapping(pairs) => {
            pairs.sort_by(|(a, _), (b, _)| sort_text(a).cmp(sort_text(b)));
        }
        YamlValue::Document(_) | YamlValue::Scalar(_) | YamlValue::Alias(_) => {}
    }
}

fn sort_text(node: &YamlNode) -> &str {
    node.scalar_text().unwrap_or_default()
}

/// Returns [`sort_lexicographic`] as an [`OrderFn`].
pub fn string_ordering() -> OrderFn {
    Arc::new(sort_lexicographic)
}

/// Moves the given keys of a mapping to the front, in the order supplied.
///
/// Keys not in the list keep their previous relative order and follow the
/// listed ones. Sequences and scalars are left alone, as is everything when
/// the key list is empty.
///
/// ```
/// use yamlfmt::document::node::YamlNode;
/// use yamlfmt::format::simple_ordering;
///
/// let mut node = YamlNode::mapping(
///     ["c", "f", "b", "e", "a"]
///         .into_iter()
///         .map(|k| (YamlNode::plain(k), YamlNode::plain("v")))
///         .collect(),
/// );
/// simple_ordering(["a", "b", "c"])("$", &mut node);
/// assert_eq!(node.keys(), vec!["a", "b", "c", "f", "e"]);
/// ```
pub fn simple_ordering<I, S>(keys: I) -> OrderFn
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let priority: IndexSet<String> = keys.into_iter().map(Into::into).collect();

    Arc::new(move |_path: &str, node: &mut YamlNode| {
        if priority.is_empty() {
            return;
        }

        if let YamlValue::Mapping(pairs) = node.value_mut() {
            // stable: unlisted keys share the same rank and keep their order
            pairs.sort_by_key(|(key, _)| {
                key.scalar_text()
                    .and_then(|text| priority.get_index_of(text))
                    .unwrap_or(usize::MAX)
            });
        }
    })
}
