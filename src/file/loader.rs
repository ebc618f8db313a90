//! Input loading.
//!
//! The formatter works on raw bytes, so loading only has to deal with where
//! the bytes come from and whether they are gzip-compressed.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Reads the formatter input.
///
/// `None` and `-` read standard input, anything else is a file path. Files
/// with a `.gz` extension are decompressed.
///
/// # Examples
///
/// ```no_run
/// use yamlfmt::file::loader::read_input;
///
/// let bytes = read_input(Some("openapi.yaml")).unwrap();
/// ```
pub fn read_input<P: AsRef<Path>>(path: Option<P>) -> Result<Vec<u8>> {
    match path {
        Some(path) if path.as_ref() != Path::new("-") => read_file(path),
        _ => read_stdin(),
    }
}

/// Reads a file from disk, decompressing it when the name ends in `.gz`.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();

    if is_gzipped(path) {
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open gzipped file {}", path.display()))?;
        return decompress(file)
            .with_context(|| format!("Failed to decompress {} - file may be corrupted", path.display()));
    }

    fs::read(path).with_context(|| format!("Failed to read file {}", path.display()))
}

/// Reads standard input until EOF.
///
/// Input starting with the gzip magic bytes is decompressed.
pub fn read_stdin() -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;
    decode_bytes(buffer)
}

/// Decompresses `buffer` if it is gzip data, otherwise returns it unchanged.
pub fn decode_bytes(buffer: Vec<u8>) -> Result<Vec<u8>> {
    if buffer.starts_with(&GZIP_MAGIC) {
        decompress(buffer.as_slice()).context("Failed to decompress gzipped stdin")
    } else {
        Ok(buffer)
    }
}

fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false)
}

fn decompress<R: Read>(reader: R) -> io::Result<Vec<u8>> {
    use flate2::read::GzDecoder;

    let mut decoder = GzDecoder::new(reader);
    let mut content = Vec::new();
    decoder.read_to_end(&mut content)?;
    Ok(content)
}
