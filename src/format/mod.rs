//! Rule-based ordering of YAML documents.
//!
//! A [`Rule`] binds a path pattern (see [`crate::yamlpath`]) to ordering
//! functions. [`lint`] applies a list of rules to a decoded tree,
//! [`lint_bytes`] does the same for raw YAML text.
//!
//! # Example
//!
//! ```
//! use yamlfmt::format::{lint_bytes, simple_ordering, string_ordering, Rule};
//!
//! let rules = vec![
//!     Rule::new("$", vec![string_ordering(), simple_ordering(["openapi", "info"])]),
//!     Rule::new("$.info", vec![simple_ordering(["title", "version"])]),
//! ];
//! let out = lint_bytes(b"paths: {}\ninfo:\n  version: 1\n  title: x\nopenapi: 3.1.0\n", &rules).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "openapi: 3.1.0\ninfo:\n  title: x\n  version: 1\npaths: {}\n"
//! );
//! ```

pub mod engine;
pub mod openapi;
pub mod ordering;
pub mod rule;

pub use engine::lint;
pub use openapi::default_openapi_rules;
pub use ordering::{simple_ordering, sort_lexicographic, string_ordering};
pub use rule::{validate, OrderFn, Rule};

use crate::document::{emit_yaml, parse_yaml, DecodeError};
use crate::yamlpath::YamlPathError;
use thiserror::Error;

/// Errors returned by [`lint_bytes`] and [`lint_str`].
#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    Path(#[from] YamlPathError),

    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("failed to parse YAML: {0}")]
    Decode(#[from] DecodeError),
}

/// Decodes `text`, applies `rules` and encodes the result.
///
/// Only the order of entries changes: scalar text and style, tags, anchors,
/// aliases, flow collections and comments are written back as read. Empty
/// input is returned unchanged.
pub fn lint_str(text: &str, rules: &[Rule]) -> Result<String, FormatError> {
    if text.is_empty() {
        return Ok(String::new());
    }

    let mut document = parse_yaml(text)?;
    lint(&mut document, rules)?;
    Ok(emit_yaml(&document))
}

/// Byte-oriented form of [`lint_str`]. Empty input is returned unchanged.
pub fn lint_bytes(bytes: &[u8], rules: &[Rule]) -> Result<Vec<u8>, FormatError> {
    if bytes.is_empty() {
        return Ok(bytes.to_vec());
    }

    let text = std::str::from_utf8(bytes)?;
    Ok(lint_str(text, rules)?.into_bytes())
}
