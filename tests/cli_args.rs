use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bho-scrape");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scrape"))
        .stdout(predicate::str::contains("catalogue"));
}

#[test]
fn empty_series_list_is_rejected() {
    let temp = tempfile::TempDir::new().expect("create temp dir");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bho-scrape");
    cmd.args(["scrape", "[]", "[tithe]", temp.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid argument `series`"));
}

#[test]
fn batch_file_with_non_list_queries_is_rejected() {
    let temp = tempfile::TempDir::new().expect("create temp dir");
    let batch_path = temp.path().join("batch.json");
    std::fs::write(
        &batch_path,
        r#"{"series": "Survey of London", "queries": 3, "out": "out"}"#,
    )
    .expect("write batch file");

    // An unroutable base url: the run must fail on validation before any request.
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bho-scrape");
    cmd.args([
        "batch",
        "--file",
        batch_path.to_str().unwrap(),
        "--base-url",
        "http://127.0.0.1:9",
        "--catalogue-dir",
        temp.path().join("catalogue").to_str().unwrap(),
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid argument `queries`"));
}

#[test]
fn rust_log_debug_emits_debug_line_to_stderr() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bho-scrape");
    cmd.env("RUST_LOG", "debug")
        .args(["catalogue", "reset", "--catalogue-dir", "does-not-exist"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed cli"));
}
