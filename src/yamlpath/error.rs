//! Error types for rule path tokenizing and validation.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while tokenizing a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YamlPathError {
    /// A structural character (`.`, `[`, `]`) appeared where the grammar forbids it.
    #[error("invalid path {path:?}: char {found:?} at position {position}: illegal token")]
    IllegalToken {
        path: String,
        found: char,
        position: usize,
    },
}

impl YamlPathError {
    /// The path string that failed to tokenize.
    pub fn path(&self) -> &str {
        match self {
            YamlPathError::IllegalToken { path, .. } => path,
        }
    }
}

/// Every path error found while validating a batch of rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    errors: Vec<YamlPathError>,
}

impl ValidationError {
    pub fn new(errors: Vec<YamlPathError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[YamlPathError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_token_display() {
        let err = YamlPathError::IllegalToken {
            path: "$[[".to_string(),
            found: '[',
            position: 2,
        };
        assert_eq!(
            err.to_string(),
            "invalid path \"$[[\": char '[' at position 2: illegal token"
        );
        assert_eq!(err.path(), "$[[");
    }

    #[test]
    fn test_validation_error_lists_every_failure() {
        let err = ValidationError::new(vec![
            YamlPathError::IllegalToken {
                path: "$[[".to_string(),
                found: '[',
                position: 2,
            },
            YamlPathError::IllegalToken {
                path: "$]".to_string(),
                found: ']',
                position: 1,
            },
        ]);
        let text = err.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("\"$[[\""));
        assert!(text.contains("\"$]\""));
    }
}
