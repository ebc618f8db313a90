//! Rule path tokenizer.
//!
//! The grammar is a small state machine over the three structural characters
//! `.`, `[` and `]`. Everything between them is opaque segment text. Each
//! emitted token keeps its leading delimiter (`.key`, `[0]`, `[*]`) so tokens
//! are self-describing.

use super::ast::{PathSegment, YamlPath};
use super::error::YamlPathError;

const DELIMITER: char = '.';
const INDEX_OPEN: char = '[';
const INDEX_CLOSE: char = ']';

/// Structural characters accepted at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Outside brackets: `.` or `[`
    Segment,
    /// Inside brackets: only `]`
    Close,
}

/// Tokenizer for rule path strings.
pub struct Parser<'a> {
    input: &'a str,
    expect: Expect,
    previous: Option<char>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given path string.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            expect: Expect::Segment,
            previous: None,
        }
    }

    /// Splits a path into its segment tokens.
    ///
    /// ```
    /// use yamlfmt::yamlpath::Parser;
    ///
    /// let tokens = Parser::tokenize("$.paths[*].get").unwrap();
    /// assert_eq!(tokens, vec!["$", ".paths", "[*]", ".get"]);
    /// ```
    pub fn tokenize(input: &'a str) -> Result<Vec<&'a str>, YamlPathError> {
        Parser::new(input).tokens()
    }

    /// Tokenizes and classifies a path.
    pub fn parse(input: &str) -> Result<YamlPath, YamlPathError> {
        let tokens = Parser::tokenize(input)?;
        Ok(YamlPath::new(
            tokens.into_iter().map(PathSegment::from_token).collect(),
        ))
    }

    fn tokens(mut self) -> Result<Vec<&'a str>, YamlPathError> {
        let mut tokens = Vec::new();
        let mut start = 0;
        let mut open = 0;

        for (position, ch) in self.input.char_indices() {
            self.check(ch, position)?;

            if ch == INDEX_OPEN {
                open = position;
            }
            if (ch == DELIMITER || ch == INDEX_OPEN) && position != start {
                tokens.push(&self.input[start..position]);
                start = position;
            }
        }

        // a bracket left open at the end of the input
        if self.expect == Expect::Close {
            return Err(YamlPathError::IllegalToken {
                path: self.input.to_string(),
                found: INDEX_OPEN,
                position: open,
            });
        }

        if start != self.input.len() {
            tokens.push(&self.input[start..]);
        }

        Ok(tokens)
    }

    /// Advances the state machine by one character.
    fn check(&mut self, ch: char, position: usize) -> Result<(), YamlPathError> {
        let previous = self.previous.replace(ch);
        let allowed = match (ch, self.expect) {
            (DELIMITER, Expect::Segment) => previous != Some(DELIMITER),
            (INDEX_OPEN, Expect::Segment) => true,
            (INDEX_CLOSE, Expect::Close) => true,
            (DELIMITER | INDEX_OPEN | INDEX_CLOSE, _) => false,
            _ => return Ok(()),
        };

        if !allowed {
            return Err(YamlPathError::IllegalToken {
                path: self.input.to_string(),
                found: ch,
                position,
            });
        }

        self.expect = if ch == INDEX_OPEN {
            Expect::Close
        } else {
            Expect::Segment
        };
        Ok(())
    }
}
