//! File I/O for the formatter.
//!
//! Input is read from a file or stdin, with transparent gzip decompression.
//! Output is written atomically, gzip-compressed for `.gz` targets, with an
//! optional backup of the file being replaced.

pub mod loader;
pub mod saver;

pub use loader::{read_input, read_stdin};
pub use saver::write_output;
