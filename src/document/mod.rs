//! Document model: the node tree plus its YAML codec.

pub mod emitter;
pub mod node;
pub mod parser;
mod scan;

pub use emitter::emit_yaml;
pub use node::{Anchor, Comments, ScalarStyle, YamlNode, YamlScalar, YamlValue};
pub use parser::{parse_yaml, DecodeError};
