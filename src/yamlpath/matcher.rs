//! Containment and match predicates between a rule path and a candidate path.
//!
//! Absolute rules compare left to right from the root. Relative rules align
//! their last segment with the candidate's last segment and compare right to
//! left, so they match at any depth. Key comparison ignores case.
//!
//! A key wildcard (`.*`) matches any key segment. An index wildcard (`[*]`)
//! matches any key or index segment, which is what lets `$.paths[*]` select
//! every path item of an OpenAPI document.

use super::ast::{PathSegment, YamlPath};

/// Unicode case-insensitive equality without allocating.
fn eq_fold(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

fn segment_matches(rule: &PathSegment, candidate: &PathSegment) -> bool {
    match (rule, candidate) {
        (PathSegment::Root, PathSegment::Root) => true,
        (PathSegment::Key(r), PathSegment::Key(c)) => eq_fold(r, c),
        (PathSegment::Index(r), PathSegment::Index(c)) => eq_fold(r, c),
        (PathSegment::KeyWildcard, PathSegment::Key(_) | PathSegment::KeyWildcard) => true,
        (PathSegment::IndexWildcard, PathSegment::Root) => false,
        (PathSegment::IndexWildcard, _) => true,
        _ => false,
    }
}

impl YamlPath {
    /// Returns true if something at or below `candidate` may still match this path.
    ///
    /// Relative paths may match anywhere, so they contain every candidate.
    ///
    /// ```
    /// use yamlfmt::yamlpath::Parser;
    ///
    /// let rule = Parser::parse("$.some.key").unwrap();
    /// assert!(rule.contains(&Parser::parse("$.some").unwrap()));
    /// assert!(!rule.contains(&Parser::parse("$.some.key.deeper").unwrap()));
    /// ```
    pub fn contains(&self, candidate: &YamlPath) -> bool {
        if self.is_empty() {
            return candidate.is_root();
        }

        if self.is_relative() {
            return true;
        }

        if candidate.len() > self.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(&candidate.segments)
            .all(|(rule, candidate)| segment_matches(rule, candidate))
    }

    /// Returns true if `candidate` satisfies this path exactly.
    ///
    /// ```
    /// use yamlfmt::yamlpath::Parser;
    ///
    /// let rule = Parser::parse(".name").unwrap();
    /// assert!(rule.matches(&Parser::parse("$.some.nested.name").unwrap()));
    /// ```
    pub fn matches(&self, candidate: &YamlPath) -> bool {
        if self.is_empty() {
            return candidate.is_root();
        }

        if self.is_relative() {
            if candidate.len() < self.len() {
                return false;
            }

            return self
                .segments
                .iter()
                .rev()
                .zip(candidate.segments.iter().rev())
                .all(|(rule, candidate)| segment_matches(rule, candidate));
        }

        self.len() == candidate.len()
            && self
                .segments
                .iter()
                .zip(&candidate.segments)
                .all(|(rule, candidate)| segment_matches(rule, candidate))
    }
}
