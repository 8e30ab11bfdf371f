use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;

fn fixture(path: &str) -> String {
    format!("{}/tests/fixtures/{path}", env!("CARGO_MANIFEST_DIR"))
}

fn read_fixture(path: &str) -> String {
    fs::read_to_string(fixture(path)).expect("fixture")
}

#[test]
fn help_lists_flags() {
    let mut cmd = cargo_bin_cmd!("exfix");
    cmd.arg("--help");
    let out = cmd.assert().success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).expect("utf8");

    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("--log-path"));
}

#[test]
fn piped_transcript_rewrites_test_files_silently() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("greet_test.go"), read_fixture("sources/greet_test.go"))
        .expect("seed");
    fs::write(temp.path().join("greet.go"), "package greet\n").expect("seed");

    let mut cmd = cargo_bin_cmd!("exfix");
    cmd.current_dir(temp.path())
        .write_stdin(read_fixture("transcripts/two-failures.txt"));
    let out = cmd.assert().success();

    assert!(out.get_output().stdout.is_empty());
    assert!(out.get_output().stderr.is_empty());
    let rewritten = fs::read_to_string(temp.path().join("greet_test.go")).expect("read");
    assert_eq!(rewritten, read_fixture("sources/greet_test.go.expected"));
    assert_eq!(
        fs::read_to_string(temp.path().join("greet.go")).expect("read"),
        "package greet\n"
    );
}

#[test]
fn log_path_writes_jsonl_events() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("greet_test.go"), read_fixture("sources/greet_test.go"))
        .expect("seed");
    let log = temp.path().join("logs/exfix.jsonl");

    let mut cmd = cargo_bin_cmd!("exfix");
    cmd.current_dir(temp.path())
        .arg("--log-path")
        .arg(&log)
        .write_stdin(read_fixture("transcripts/two-failures.txt"));
    cmd.assert().success();

    let text = fs::read_to_string(&log).expect("log");
    assert!(text.contains("\"event_type\":\"transcript_parsed\""));
    assert!(text.contains("\"event_type\":\"file_rewritten\""));
    assert!(text.contains("\"event_type\":\"run_complete\""));
}

#[test]
fn missing_working_dir_exits_nonzero_with_message() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut cmd = cargo_bin_cmd!("exfix");
    cmd.current_dir(temp.path())
        .arg("--working-dir")
        .arg("does-not-exist")
        .write_stdin("");
    let out = cmd.assert().failure().code(1);
    let stderr = String::from_utf8(out.get_output().stderr.clone()).expect("utf8");
    assert!(stderr.contains("list candidate files"));
}

#[test]
fn named_file_argument_exits_nonzero() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut cmd = cargo_bin_cmd!("exfix");
    cmd.current_dir(temp.path()).arg("greet_test.go").write_stdin("");
    cmd.assert().failure().code(1);
}

#[test]
fn missing_config_file_is_reported_as_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut cmd = cargo_bin_cmd!("exfix");
    cmd.current_dir(temp.path())
        .arg("--config")
        .arg("missing.toml")
        .write_stdin("");
    let out = cmd.assert().failure().code(1);
    let stderr = String::from_utf8(out.get_output().stderr.clone()).expect("utf8");
    assert!(stderr.starts_with("read config: "));
    assert!(stderr.contains("missing.toml"));
}
