//! End-to-end tests for the `openapi-fmt` binary.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn openapi_fmt(dir: &Path, args: &[&str], stdin: Option<&[u8]>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_openapi-fmt"))
        .args(args)
        .current_dir(dir)
        // keep a developer's own config out of the picture
        .env("HOME", dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    {
        let mut pipe = child.stdin.take().unwrap();
        if let Some(data) = stdin {
            // the binary may exit (e.g. on bad arguments) before reading stdin
            if let Err(e) = pipe.write_all(data) {
                assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe, "{e}");
            }
        }
    }

    child.wait_with_output().unwrap()
}

#[test]
fn test_formats_file_to_stdout() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("api.yaml"), "paths: {}\nopenapi: 3.1.0\n").unwrap();

    let out = openapi_fmt(dir.path(), &["-f", "api.yaml"], None);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "openapi: 3.1.0\npaths: {}\n");
}

#[test]
fn test_reads_stdin() {
    let dir = TempDir::new().unwrap();
    let out = openapi_fmt(
        dir.path(),
        &["--no-default-rules", "--alphabetical", "$"],
        Some(b"b: 1\na: 2\n"),
    );
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "a: 2\nb: 1\n");
}

#[test]
fn test_writes_output_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("api.yaml"), "b: 1\na: 2\nc: 3\n").unwrap();

    let out = openapi_fmt(
        dir.path(),
        &[
            "-f",
            "api.yaml",
            "-o",
            "out.yaml",
            "--no-default-rules",
            "--simple",
            "$=c,a",
        ],
        None,
    );
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
    assert_eq!(
        fs::read_to_string(dir.path().join("out.yaml")).unwrap(),
        "c: 3\na: 2\nb: 1\n"
    );
}

#[test]
fn test_invalid_simple_rule() {
    let dir = TempDir::new().unwrap();
    let out = openapi_fmt(dir.path(), &["--simple", "$.info"], Some(b"a: 1\n"));
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid rule format"));
}

#[test]
fn test_invalid_rule_path_is_reported() {
    let dir = TempDir::new().unwrap();
    let out = openapi_fmt(
        dir.path(),
        &["--alphabetical", "$[[", "--alphabetical", "$]"],
        Some(b"a: 1\n"),
    );
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("illegal token"));
    assert!(stderr.contains("\"$]\""));
    assert!(out.stdout.is_empty());
}

#[test]
fn test_check_mode() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("messy.yaml"), "paths: {}\nopenapi: 3.1.0\n").unwrap();
    fs::write(dir.path().join("clean.yaml"), "openapi: 3.1.0\npaths: {}\n").unwrap();

    let messy = openapi_fmt(dir.path(), &["--check", "-f", "messy.yaml"], None);
    assert_eq!(messy.status.code(), Some(1));
    assert!(messy.stdout.is_empty());

    let clean = openapi_fmt(dir.path(), &["--check", "-f", "clean.yaml"], None);
    assert!(clean.status.success());
}

#[test]
fn test_config_file_flag() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("fmt.toml"),
        "default_rules = false\nalphabetical = [\"$\"]\n",
    )
    .unwrap();

    let out = openapi_fmt(
        dir.path(),
        &["--config", "fmt.toml"],
        Some(b"openapi: 3.1.0\ninfo: {}\n"),
    );
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "info: {}\nopenapi: 3.1.0\n"
    );
}
