//! Rule application over a document tree.
//!
//! Every rule gets its own pass. A pass starts with a frontier holding only
//! the document content at path `$` and repeatedly takes one entry from it:
//! entries the rule can no longer reach are dropped, the children of every
//! reachable entry are added to the frontier, and matching entries have the
//! rule's functions run on them. Relative rules reach everything, so they walk
//! the whole tree.
//!
//! Children are labelled before the functions run: a sequence element keeps
//! the index it had when its parent was reached, wherever the functions move
//! it.
//!
//! Passes are not merged: shared ancestors are walked once per rule, and each
//! rule sees the tree as left by the rules before it.

use super::rule::Rule;
use crate::document::node::{YamlNode, YamlValue};
use crate::yamlpath::{YamlPath, YamlPathError};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Index of each sequence element, keyed by the element's address.
type Labels = HashMap<*const YamlNode, usize>;

/// Applies `rules` to `node`, in order, mutating it in place.
///
/// `node` may be a document (its content is ordered, an empty document is
/// left alone) or any content node. All rule paths are parsed before the
/// tree is touched, so a malformed path leaves the tree unmodified.
///
/// ```
/// use yamlfmt::document::parser::parse_yaml;
/// use yamlfmt::format::{lint, string_ordering, Rule};
///
/// let mut doc = parse_yaml("b: 1\na: 2\n").unwrap();
/// lint(&mut doc, &[Rule::new("$", vec![string_ordering()])]).unwrap();
/// assert_eq!(doc.content().unwrap().keys(), vec!["a", "b"]);
/// ```
pub fn lint(node: &mut YamlNode, rules: &[Rule]) -> Result<(), YamlPathError> {
    if rules.is_empty() {
        return Ok(());
    }

    let patterns = rules
        .iter()
        .map(Rule::compile)
        .collect::<Result<Vec<_>, _>>()?;

    let is_document = matches!(node.value(), YamlValue::Document(_));
    let content = if is_document {
        match node.value_mut() {
            YamlValue::Document(Some(content)) => &mut **content,
            // nothing to order
            _ => return Ok(()),
        }
    } else {
        node
    };

    for (rule, pattern) in rules.iter().zip(&patterns) {
        apply_rule(content, rule, pattern);
    }

    Ok(())
}

fn apply_rule(root: &mut YamlNode, rule: &Rule, pattern: &YamlPath) {
    let mut frontier: Vec<(YamlPath, &mut YamlNode)> = vec![(YamlPath::root(), root)];
    let mut visited = 0usize;
    let mut matched = 0usize;

    while let Some((path, node)) = frontier.pop() {
        visited += 1;

        if !pattern.contains(&path) {
            continue;
        }

        if !pattern.matches(&path) {
            frontier.extend(children(&path, node, None));
            continue;
        }

        matched += 1;
        let labels = element_labels(node);
        let rendered = path.to_string();
        trace!(rule = rule.path(), path = %rendered, "rule matched");
        rule.run(&rendered, node);
        frontier.extend(children(&path, node, Some(&labels)));
    }

    debug!(rule = rule.path(), visited, matched, "rule applied");
}

fn element_labels(node: &YamlNode) -> Labels {
    match node.value() {
        YamlValue::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| (&**item as *const YamlNode, index))
            .collect(),
        _ => Labels::new(),
    }
}

/// Child entries of a node: mapping values under `.key`, sequence elements
/// under `[i]`. Keys themselves are never visited.
///
/// With `labels`, an element found there gets its recorded index instead of
/// its current position.
fn children<'a>(
    path: &YamlPath,
    node: &'a mut YamlNode,
    labels: Option<&Labels>,
) -> Vec<(YamlPath, &'a mut YamlNode)> {
    match node.value_mut() {
        YamlValue::Mapping(pairs) => pairs
            .iter_mut()
            .map(|(key, value)| (path.child_key(key.scalar_text().unwrap_or_default()), value))
            .collect(),
        YamlValue::Sequence(items) => items
            .iter_mut()
            .enumerate()
            .map(|(position, item)| {
                let address: *const YamlNode = &**item;
                let index = labels
                    .and_then(|labels| labels.get(&address))
                    .copied()
                    .unwrap_or(position);
                (path.child_index(index), &mut **item)
            })
            .collect(),
        YamlValue::Document(_) | YamlValue::Scalar(_) | YamlValue::Alias(_) => Vec::new(),
    }
}
