//! Integration tests for `treeline parse` and `treeline paths`.
//!
//! Feeds captured build tool output (files and stdin) to the compiled binary.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../crates/build-tree/tests/fixtures")
        .join(name)
}

fn treeline(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_treeline"));
    cmd.current_dir(dir).env("NO_COLOR", "1").env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("TREELINE_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

fn finish(output: Output) -> (Option<i32>, String, String) {
    (
        output.status.code(),
        String::from_utf8(output.stdout).expect("stdout is UTF-8"),
        String::from_utf8(output.stderr).expect("stderr is UTF-8"),
    )
}

fn run(cmd: &mut Command) -> (Option<i32>, String, String) {
    finish(cmd.output().expect("binary should run"))
}

fn run_with_stdin(cmd: &mut Command, input: &str) -> (Option<i32>, String, String) {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary should start");
    // 입력 제한에 걸리면 자식이 먼저 stdin을 닫을 수 있음
    let _ = child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes());
    finish(child.wait_with_output().expect("binary should finish"))
}

#[test]
fn test_parse_maven_file_json() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let (code, stdout, _) = run(treeline(temp_dir.path())
        .args(["parse", "--output", "json"])
        .arg(fixture("maven-multi-module.txt")));

    assert_eq!(code, Some(0));
    let tree: serde_json::Value = serde_json::from_str(&stdout).expect("canonical tree JSON");
    assert_eq!(tree["name"], "com.shop:shop-parent");
    assert_eq!(tree["packageFormatVersion"], "mvn:0.0.1");
    assert_eq!(tree["dependencies"].as_object().map(|d| d.len()), Some(4));
    assert_eq!(
        tree["dependencies"]["com.shop:shop-api"]["from"][1],
        "com.shop:shop-api@1.4.0"
    );
}

#[test]
fn test_parse_gradle_file_text_uses_project_seed() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let (code, stdout, _) = run(treeline(temp_dir.path())
        .arg("parse")
        .arg(fixture("gradle-dependencies.txt"))
        .args(["--project-name", "shop", "--project-version", "1.0"]));

    assert_eq!(code, Some(0));
    let first = stdout.lines().next().expect("header line");
    assert!(first.starts_with("shop@1.0 ("), "unexpected header: {first}");
    assert!(stdout.contains("├── com.google.guava:guava@32.1.2-jre"));
    assert!(stdout.contains("└── org.slf4j:slf4j-api@2.0.9"));
}

#[test]
fn test_parse_sbt_from_stdin() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let input = std::fs::read_to_string(fixture("sbt-dependency-tree.txt")).expect("fixture");

    let (code, stdout, _) = run_with_stdin(
        treeline(temp_dir.path()).args([
            "parse",
            "-",
            "--tool",
            "sbt",
            "--project-name",
            "shop",
            "--project-version",
            "0.3.0",
            "--output",
            "json",
        ]),
        &input,
    );

    assert_eq!(code, Some(0));
    let tree: serde_json::Value = serde_json::from_str(&stdout).expect("canonical tree JSON");
    assert_eq!(tree["name"], "shop");
    assert_eq!(tree["version"], "0.3.0");
    let deps = tree["dependencies"].as_object().expect("dependencies object");
    assert_eq!(deps.len(), 3);
    assert!(deps.contains_key("ch.qos.logback:logback-classic"));
}

#[test]
fn test_parse_unrecognized_output_exit_code() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let (code, _, stderr) = run_with_stdin(
        treeline(temp_dir.path()).args(["parse", "-"]),
        "BUILD SUCCESSFUL in 2s\n",
    );

    assert_eq!(code, Some(3));
    assert!(stderr.contains("unrecognized build tool output"));
}

#[test]
fn test_parse_forced_wrong_tool_exit_code() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let (code, _, stderr) = run(treeline(temp_dir.path())
        .arg("parse")
        .arg(fixture("gradle-dependencies.txt"))
        .args(["--tool", "maven"]));

    assert_eq!(code, Some(3));
    assert!(stderr.contains("digraph-extract"));
}

#[test]
fn test_parse_missing_file_exit_code() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let (code, _, stderr) = run(treeline(temp_dir.path()).args(["parse", "nowhere.txt"]));

    assert_eq!(code, Some(10));
    assert!(stderr.contains("nowhere.txt"));
}

#[test]
fn test_parse_respects_configured_input_limit() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    std::fs::write(
        temp_dir.path().join("treeline.toml"),
        "[parser]\nmax_input_size = 100\n",
    )
    .expect("should write config");

    let input = std::fs::read_to_string(fixture("maven-multi-module.txt")).expect("fixture");
    let (code, _, stderr) = run_with_stdin(treeline(temp_dir.path()).args(["parse", "-"]), &input);

    assert_eq!(code, Some(3));
    assert!(stderr.contains("input too large"));
}

#[test]
fn test_parse_blank_project_name_is_command_error() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let (code, _, stderr) = run(treeline(temp_dir.path())
        .arg("parse")
        .arg(fixture("sbt-dependency-tree.txt"))
        .args(["--project-name", " "]));

    assert_eq!(code, Some(1));
    assert!(stderr.contains("invalid project seed"));
}

#[test]
fn test_paths_lists_cloned_subtree_positions() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let (code, stdout, _) = run(treeline(temp_dir.path())
        .arg("paths")
        .arg(fixture("gradle-dependencies.txt"))
        .args([
            "--package",
            "org.springframework:spring-jcl",
            "--project-name",
            "shop",
            "--project-version",
            "1.0",
            "--output",
            "json",
        ]));

    assert_eq!(code, Some(0));
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("paths JSON");
    assert_eq!(report["root"], "shop@1.0");
    assert_eq!(report["versions"][0], "6.0.13");
    let paths = report["paths"].as_array().expect("paths array");
    assert_eq!(paths.len(), 2, "original and omitted occurrence");
    assert_eq!(paths[1][2], "org.springframework:spring-web@6.0.13");
}

#[test]
fn test_paths_text_for_maven_module() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let (code, stdout, _) = run(treeline(temp_dir.path())
        .arg("paths")
        .arg(fixture("maven-multi-module.txt"))
        .args(["-p", "org.slf4j:slf4j-api"]));

    assert_eq!(code, Some(0));
    assert!(stdout.starts_with("2 path(s) to org.slf4j:slf4j-api (2.0.9)"));
    assert!(stdout.contains(
        "com.shop:shop-parent@1.4.0 > com.shop:shop-web@1.4.0 > com.shop:shop-api@1.4.0 > org.slf4j:slf4j-api@2.0.9"
    ));
}

#[test]
fn test_paths_unknown_package_exit_code() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let (code, stdout, stderr) = run(treeline(temp_dir.path())
        .arg("paths")
        .arg(fixture("maven-multi-module.txt"))
        .args(["-p", "org.none:none"]));

    assert_eq!(code, Some(1));
    assert!(stdout.contains("No paths to org.none:none"));
    assert!(stderr.contains("not found"));
}
