//! Opinionated key ordering for YAML documents.
//!
//! Rules pair a path pattern such as `$.paths[*].get` or `.schema` with
//! ordering functions. The formatter walks the document once per rule and
//! reorders every matching mapping or sequence in place. A default rule set
//! for OpenAPI documents is included.

pub mod config;
pub mod document;
pub mod file;
pub mod format;
pub mod yamlpath;
