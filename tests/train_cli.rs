use assert_cmd::Command;
use predicates::prelude::*;

use fadeline::persist::read_table;

fn train() -> Command {
    Command::cargo_bin("train").expect("binary exists")
}

#[test]
fn explicit_train_writes_a_verifiable_table() {
    let dir = tempfile::tempdir().expect("tempdir");
    let table = dir.path().join("table.data");
    let summary = dir.path().join("summary.json");

    train()
        .args([
            "train-explicit",
            table.to_str().expect("utf8 path"),
            "--n",
            "3",
            "--m",
            "3",
            "--summary",
            summary.to_str().expect("utf8 path"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("[train] initial state (code=0)"))
        .stdout(predicate::str::contains("wrote"));

    train()
        .args(["verify", table.to_str().expect("utf8 path")])
        .assert()
        .success()
        .stdout(predicate::str::contains("structure ok"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary).expect("summary exists"))
            .expect("summary parses");
    assert_eq!(json["n"], 3);
    assert_eq!(json["mode"], "explicit");
    assert!(json["table_sha256"].as_str().map_or(0, str::len) == 64);
}

#[test]
fn single_sided_passes_merge_into_the_full_table() {
    let dir = tempfile::tempdir().expect("tempdir");
    let xwin = dir.path().join("xwin.data");
    let ywin = dir.path().join("ywin.data");
    let merged = dir.path().join("merged.data");

    for (cmd, path) in [("train-xwin", &xwin), ("train-ywin", &ywin)] {
        train()
            .args([cmd, path.to_str().expect("utf8 path"), "--n", "3", "--m", "3"])
            .assert()
            .success()
            .stdout(predicate::str::contains("wrote"));
    }

    train()
        .args([
            "merge",
            xwin.to_str().expect("utf8 path"),
            ywin.to_str().expect("utf8 path"),
            merged.to_str().expect("utf8 path"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("[merge] done"));

    train()
        .args(["verify", merged.to_str().expect("utf8 path")])
        .assert()
        .success();

    // every merged state is determined on at least one phase
    let records = read_table(&merged).expect("read merged");
    assert!(!records.is_empty());
    assert!(records.iter().all(|r| r.dp0 != 0 || r.dp1 != 0));
}

#[test]
fn count_reports_canonical_states_without_writing() {
    train()
        .args(["count", "--n", "3", "--m", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("canonical states"));
}

#[test]
fn bad_parameters_exit_nonzero() {
    train()
        .args(["count", "--n", "3", "--m", "3", "--base", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base"));
}

#[test]
fn verify_of_a_missing_table_fails() {
    train()
        .args(["verify", "/nonexistent/never/table.data"])
        .assert()
        .failure();
}

#[test]
fn merge_of_missing_inputs_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out.data");
    train()
        .args([
            "merge",
            "/nonexistent/x.data",
            "/nonexistent/y.data",
            out.to_str().expect("utf8 path"),
        ])
        .assert()
        .failure();
}
