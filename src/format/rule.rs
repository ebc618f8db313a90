//! Rules: a path pattern bound to ordering functions.

use crate::document::node::YamlNode;
use crate::yamlpath::{Parser, ValidationError, YamlPath, YamlPathError};
use std::fmt;
use std::sync::Arc;

/// An ordering action run on a matched node. The first argument is the
/// rendered path of the node (e.g. `$.paths./pets.get`).
pub type OrderFn = Arc<dyn Fn(&str, &mut YamlNode) + Send + Sync>;

/// A path pattern plus the ordering functions to run where it matches.
///
/// Path syntax (no filters):
/// - `$` is the document root
/// - `$.key` selects a key
/// - `$[0]` selects an index
/// - `$[*]` or `$.*` are wildcards
/// - `$.some[*].*.name` combines any of the above
/// - `.key` without `$` matches at any depth
#[derive(Clone)]
pub struct Rule {
    path: String,
    functions: Vec<OrderFn>,
}

impl Rule {
    /// Creates a rule. The path is not checked here, see [`validate`].
    pub fn new(path: impl Into<String>, functions: Vec<OrderFn>) -> Self {
        Self {
            path: path.into(),
            functions,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn functions(&self) -> &[OrderFn] {
        &self.functions
    }

    /// Runs every function of the rule on `node`, in the order they were given.
    pub fn run(&self, path: &str, node: &mut YamlNode) {
        for function in &self.functions {
            function(path, node);
        }
    }

    /// Parses the rule path.
    pub fn compile(&self) -> Result<YamlPath, YamlPathError> {
        Parser::parse(&self.path)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("path", &self.path)
            .field("functions", &self.functions.len())
            .finish()
    }
}

/// Checks every rule path, reporting all failures at once.
///
/// ```
/// use yamlfmt::format::{string_ordering, validate, Rule};
///
/// let rules = vec![
///     Rule::new("$.info", vec![string_ordering()]),
///     Rule::new("$[[", vec![string_ordering()]),
///     Rule::new("$.a]", vec![string_ordering()]),
/// ];
/// let err = validate(&rules).unwrap_err();
/// assert_eq!(err.len(), 2);
/// ```
pub fn validate(rules: &[Rule]) -> Result<(), ValidationError> {
    let errors: Vec<YamlPathError> = rules
        .iter()
        .filter_map(|rule| rule.compile().err())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}
