//! CLI integration tests
//!
//! Run the `paramtree` binary against checkpoint directories on disk.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn checkpoint_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config"), "").unwrap();
    fs::write(
        dir.path().join("logopts"),
        "CPU0: DEBUG=ignore, INFO=report, ERROR=report, PANIC=fatal\n\
         ATA: DEBUG=report, INFO=report, ERROR=ask, PANIC=fatal\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("ata"),
        "ata = {\n  present = true\n  type = cdrom\n}\n",
    )
    .unwrap();
    fs::write(dir.path().join("memory.ram"), [0u8; 16]).unwrap();
    dir
}

fn paramtree(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_paramtree"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_inspect_prints_outline() {
    let dir = checkpoint_dir();

    let output = paramtree(&["inspect", dir.path().to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("ata (state, "));
    assert!(stdout.contains("  ata.present = true\n"));
    assert!(stdout.contains("  ata.type = cdrom\n"));
    assert!(stdout.contains("memory.ram (sidecar, 16 bytes)"));
}

#[test]
fn test_inspect_json() {
    let dir = checkpoint_dir();

    let output = paramtree(&["inspect", dir.path().to_str().unwrap(), "--json"]);

    assert!(output.status.success());
    let files: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let files = files.as_array().unwrap();
    assert_eq!(files.len(), 4);
    let ata = files.iter().find(|f| f["name"] == "ata").unwrap();
    assert_eq!(ata["kind"], "state");
    assert_eq!(ata["entries"][1]["path"], "ata.type");
    assert_eq!(ata["entries"][1]["value"], "cdrom");
}

#[test]
fn test_inspect_rejects_malformed_state_file() {
    let dir = checkpoint_dir();
    fs::write(dir.path().join("cpu"), "cpu = {\n  eax = 1\n").unwrap();

    let output = paramtree(&["inspect", dir.path().to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("ERR_FORMAT"));
}

#[test]
fn test_logopts_prints_table() {
    let dir = checkpoint_dir();

    let output = paramtree(&["logopts", dir.path().to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "MODULE  DEBUG   INFO    ERROR   PANIC");
    assert_eq!(lines[1], "CPU0    ignore  report  report  fatal");
    assert_eq!(lines[2], "ATA     report  report  ask     fatal");
}

#[test]
fn test_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let output = paramtree(&["logopts", missing.to_str().unwrap()]);

    assert!(!output.status.success());
}
