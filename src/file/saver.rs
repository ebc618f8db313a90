//! Output writing.
//!
//! Output files are written atomically: the data goes to a temporary file
//! next to the target which is then renamed over it.

use crate::config::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Writes formatted output to `path`.
///
/// A `.gz` target is gzip-compressed. When `config.create_backup` is set and
/// the target exists, it is first copied to `<name>.bak`.
///
/// # Examples
///
/// ```no_run
/// use yamlfmt::config::Config;
/// use yamlfmt::file::saver::write_output;
///
/// write_output("openapi.yaml", b"openapi: 3.1.0\n", &Config::default()).unwrap();
/// ```
pub fn write_output<P: AsRef<Path>>(path: P, data: &[u8], config: &Config) -> Result<()> {
    let path = path.as_ref();

    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    let compress = path.to_string_lossy().ends_with(".gz");
    write_file_atomic(path, data, compress)
}

/// Copies `path` to `<name>.bak` in the same directory.
fn create_backup(path: &Path) -> Result<()> {
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, &backup_path)
        .with_context(|| format!("Failed to create backup {}", backup_path.display()))?;
    Ok(())
}

fn write_file_atomic(path: &Path, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let temp_path = temp_path(path)?;

    if compress {
        let file = fs::File::create(&temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(&temp_path, data).context("Failed to write temp file")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}

/// `<name>.tmp` next to the target.
fn temp_path(path: &Path) -> Result<std::path::PathBuf> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    Ok(path.with_file_name(format!("{}.tmp", name)))
}
