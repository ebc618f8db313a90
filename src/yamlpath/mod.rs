//! Rule path language: tokenizer, typed segments and matching predicates.
//!
//! # Supported Syntax
//!
//! - `$` - Document root
//! - `.key` - Named key (compared case-insensitively)
//! - `[0]` - Sequence index
//! - `.*` - Any key
//! - `[*]` - Any key or index
//!
//! Paths starting with `$` are absolute. Paths without it (`.schema`,
//! `.schemas[*].properties`) are relative and match wherever the tail of a
//! node's path lines up with them. Filter expressions, slices and recursive
//! descent are not supported.
//!
//! # Examples
//!
//! ```
//! // $.paths[*].get - the GET operation of every path item
//! // $.servers[0] - the first server
//! // .schema.properties - every schema's properties, at any depth
//! ```

pub mod ast;
pub mod error;
pub mod matcher;
pub mod parser;

pub use ast::{PathSegment, YamlPath};
pub use error::{ValidationError, YamlPathError};
pub use parser::Parser;
