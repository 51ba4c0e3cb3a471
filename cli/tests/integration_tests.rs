use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const NAVAL_FATE: &str = "Naval Fate.

Usage:
  naval_fate ship new <name>...
  naval_fate ship <name> move <x> <y> [--speed=<kn>]
  naval_fate -h | --help
  naval_fate --version

Options:
  -h --help     Show this screen.
  --version     Show version.
  --speed=<kn>  Speed in knots [default: 10].
";

fn write_usage(dir: &TempDir, doc: &str) -> String {
    let path = dir.path().join("usage.txt");
    fs::write(&path, doc).expect("failed to write usage file");
    path_str(&path)
}

fn path_str(path: &Path) -> String {
    path.to_str().expect("temp path must be UTF-8").to_string()
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docopt-match"))
        .args(args)
        .output()
        .expect("failed to run docopt-match")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn matched_arguments_print_as_json() {
    let dir = TempDir::new().unwrap();
    let usage = write_usage(&dir, NAVAL_FATE);

    let output = run(&["--usage-file", &usage, "--", "ship", "new", "Titanic"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    assert_eq!(json["ship"], serde_json::json!(true));
    assert_eq!(json["new"], serde_json::json!(true));
    assert_eq!(json["<name>"], serde_json::json!(["Titanic"]));
    assert_eq!(json["--speed"], serde_json::json!("10"));
    assert_eq!(json["<x>"], serde_json::Value::Null);
}

#[test]
fn yaml_format_is_supported() {
    let dir = TempDir::new().unwrap();
    let usage = write_usage(&dir, NAVAL_FATE);

    let output = run(&[
        "--usage-file",
        &usage,
        "--format",
        "yaml",
        "--",
        "ship",
        "Guardian",
        "move",
        "1",
        "2",
        "--speed=20",
    ]);
    assert!(output.status.success());

    let yaml: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).expect("stdout should be YAML");
    assert_eq!(yaml["--speed"], serde_yaml::Value::from("20"));
    assert_eq!(yaml["move"], serde_yaml::Value::from(true));
}

#[test]
fn usage_is_read_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_docopt-match"))
        .args(["--", "-v", "file.txt"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run docopt-match");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(b"Usage: prog [-v] <file>\n")
        .expect("failed to write stdin");
    let output = child.wait_with_output().expect("failed to wait for docopt-match");

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json, serde_json::json!({"-v": true, "<file>": "file.txt"}));
}

#[test]
fn help_prints_the_document() {
    let dir = TempDir::new().unwrap();
    let usage = write_usage(&dir, NAVAL_FATE);

    let output = run(&["--usage-file", &usage, "--", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Naval Fate."));
    assert!(stdout.contains("--speed=<kn>"));
}

#[test]
fn no_help_turns_help_into_a_flag() {
    let dir = TempDir::new().unwrap();
    let usage = write_usage(&dir, NAVAL_FATE);

    let output = run(&["--usage-file", &usage, "--no-help", "--", "--help"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["--help"], serde_json::json!(true));
}

#[test]
fn version_string_enables_version_handling() {
    let dir = TempDir::new().unwrap();
    let usage = write_usage(&dir, NAVAL_FATE);

    let output = run(&[
        "--usage-file",
        &usage,
        "--version-string",
        "Naval Fate 2.0",
        "--",
        "--version",
    ]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Naval Fate 2.0");

    // Without a version string `--version` is matched like any flag.
    let output = run(&["--usage-file", &usage, "--", "--version"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["--version"], serde_json::json!(true));
}

#[test]
fn argument_error_prints_message_and_usage() {
    let dir = TempDir::new().unwrap();
    let usage = write_usage(&dir, NAVAL_FATE);

    let output = run(&["--usage-file", &usage, "--", "ship", "new"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Arguments did not match expected patterns"));
    assert!(stderr.contains("Usage:\n  naval_fate ship new <name>..."));
}

#[test]
fn grammar_error_exits_with_two() {
    let dir = TempDir::new().unwrap();
    let usage = write_usage(&dir, "Usage: prog [unclosed");

    let output = run(&["--usage-file", &usage]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Mismatched '['"));
}

#[test]
fn config_file_sets_options_first() {
    let dir = TempDir::new().unwrap();
    let usage = write_usage(&dir, "Usage: prog [-v] <cmd> [<args>...]");
    let config = dir.path().join("config.yaml");
    fs::write(&config, "options_first: true\n").expect("failed to write config");

    let output = run(&[
        "--usage-file",
        &usage,
        "--config",
        &path_str(&config),
        "--",
        "-v",
        "exec",
        "-v",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({"-v": true, "<cmd>": "exec", "<args>": ["-v"]})
    );

    // The same argv without options-first leaves a stray `-v`.
    let output = run(&["--usage-file", &usage, "--", "-v", "exec", "-v"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn missing_usage_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let missing = path_str(&dir.path().join("nope.txt"));

    let output = run(&["--usage-file", &missing]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}
