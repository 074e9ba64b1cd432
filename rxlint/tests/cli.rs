//! End-to-end runs of the `rxlint` binary

use pretty_assertions::assert_eq;
use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

const RXJS: &str = include_str!("../../rxlint-types/tests/fixtures/rxjs.rxd");

fn fixture(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file
}

fn rxlint(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rxlint"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RXLINT_LOG")
        .env_remove("RXLINT_MAX_DEPTH")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_check_reports_summary() {
    let file = fixture(RXJS);
    let output = rxlint(&["check", file.path().to_str().unwrap()]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("18 bindings"));
}

#[test]
fn test_check_reports_lowering_errors() {
    let file = fixture("let x: Missing;");
    let output = rxlint(&["check", file.path().to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Cannot find type `Missing`"));
}

#[test]
fn test_check_reports_parse_errors() {
    let file = fixture("class Foo");
    let output = rxlint(&["check", file.path().to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("rxlint::decl"));
}

#[test]
fn test_check_warns_about_recursive_types() {
    let file = fixture("interface Node extends Node;");
    let output = rxlint(&["check", file.path().to_str().unwrap()]);

    assert!(output.status.success());
    assert!(stderr(&output).contains("recursive types: Node"));
}

#[test]
fn test_missing_file() {
    let output = rxlint(&["check", "/definitely/not/here.rxd"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("File not found"));
}

#[test]
fn test_probe_named_predicates() {
    let file = fixture(RXJS);
    let path = file.path().to_str().unwrap();
    let output = rxlint(&["probe", path, "behavior", "-p", "subject", "-p", "behavior_subject", "-p", "error"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "subject:          true\nbehavior-subject: true\nerror:            false\n"
    );
}

#[test]
fn test_probe_all_predicates() {
    let file = fixture(RXJS);
    let output = rxlint(&["probe", file.path().to_str().unwrap(), "operator"]);

    let out = stdout(&output);
    assert_eq!(out.lines().count(), 11);
    assert!(out.contains("mono-type-operator-function: true"));
    assert!(out.lines().any(|line| line.starts_with("function:") && line.ends_with("true")));
}

#[test]
fn test_probe_ad_hoc_target() {
    let file = fixture(RXJS);
    let path = file.path().to_str().unwrap();

    let output = rxlint(&["probe", path, "subject", "--type", "Observable", "--qualifier", "rxjs"]);
    assert_eq!(stdout(&output), "could-be Observable in /rxjs/: true\n");

    let output = rxlint(&["probe", path, "declared", "--type", "Subject$", "--pattern", "--returns"]);
    assert_eq!(stdout(&output), "returns /Subject$/: true\n");
}

#[test]
fn test_probe_unknown_location() {
    let file = fixture(RXJS);
    let output = rxlint(&["probe", file.path().to_str().unwrap(), "nowhere"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown location `nowhere`"));
}

#[test]
fn test_probe_rejects_unknown_predicate() {
    let file = fixture(RXJS);
    let output = rxlint(&["probe", file.path().to_str().unwrap(), "source", "-p", "observables"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("observables"));
}

#[test]
fn test_qualifier_requires_type() {
    let file = fixture(RXJS);
    let output = rxlint(&["probe", file.path().to_str().unwrap(), "source", "--qualifier", "rxjs"]);

    assert!(!output.status.success());
}

#[test]
fn test_max_depth_flag() {
    let file = fixture(RXJS);
    let path = file.path().to_str().unwrap();

    let output = rxlint(&["--max-depth", "0", "probe", path, "behavior", "-p", "observable"]);
    assert_eq!(stdout(&output), "observable: false\n");

    let output = rxlint(&["probe", path, "behavior", "-p", "observable", "--no-memo"]);
    assert_eq!(stdout(&output), "observable: true\n");
}

#[test]
fn test_dump_lists_bindings() {
    let file = fixture("class Foo; let a: Foo | string; fn f() => Foo;");
    let output = rxlint(&["dump", file.path().to_str().unwrap()]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "declarations:\n  Foo = Foo\nbindings:\n  let a: Foo | string\n  fn f() => Foo\n"
    );
}
