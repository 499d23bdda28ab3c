use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::fs;
use std::process::Command; // Run programs
use tempfile::TempDir;

const BIN: &str = "cqdb";

#[test]
fn cli_argument_parsing() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin(BIN)?;
    cmd.arg("-h");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Print help"));

    cmd = Command::cargo_bin(BIN)?;
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains(BIN));

    cmd = Command::cargo_bin(BIN)?;
    cmd.arg("minimize").arg("only-one-path");
    cmd.assert().failure().stderr(predicate::str::contains(
        "required arguments were not provided",
    ));

    cmd = Command::cargo_bin(BIN)?;
    cmd.arg("minimize").arg("-v").arg("-q").arg("a").arg("b");
    cmd.assert().failure().stderr(predicate::str::contains(
        "cannot be used with",
    ));

    cmd = Command::cargo_bin(BIN)?;
    cmd.arg("minimize").arg("--log").arg("cats").arg("a").arg("b");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("'--log <LOG_LEVEL>'"));
    Ok(())
}

#[test]
fn missing_input_fails_with_nonzero_exit() -> Result<(), Box<dyn std::error::Error>> {
    let directory = TempDir::new()?;

    let mut cmd = Command::cargo_bin(BIN)?;
    cmd.arg("minimize")
        .arg(directory.path().join("no-such-query.txt"))
        .arg(directory.path().join("out.txt"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
    Ok(())
}

#[test]
fn minimize_writes_the_reduced_query() -> Result<(), Box<dyn std::error::Error>> {
    let directory = TempDir::new()?;
    let input = directory.path().join("query.txt");
    let output = directory.path().join("minimized.txt");
    fs::write(&input, "Q(x) :- R(x, y), R(x, z)")?;

    let mut cmd = Command::cargo_bin(BIN)?;
    cmd.arg("minimize").arg(&input).arg(&output);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Minimized query written"));

    assert_eq!(fs::read_to_string(&output)?.trim(), "Q(x) :- R(x, z)");
    Ok(())
}

#[test]
fn evaluate_writes_result_tuples() -> Result<(), Box<dyn std::error::Error>> {
    let directory = TempDir::new()?;
    fs::create_dir(directory.path().join("files"))?;
    fs::write(directory.path().join("schema.txt"), "R int int\nS int int\n")?;
    fs::write(directory.path().join("files/R.csv"), "1, 2\n3, 2\n5, 6\n")?;
    fs::write(directory.path().join("files/S.csv"), "2, 10\n6, 20\n")?;

    let query = directory.path().join("query.txt");
    let output = directory.path().join("output.csv");
    fs::write(&query, "Q(a, c) :- R(a, b), S(b, c), a > 1")?;

    let mut cmd = Command::cargo_bin(BIN)?;
    cmd.arg("evaluate")
        .arg(directory.path())
        .arg(&query)
        .arg(&output);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 result tuples"));

    let mut lines: Vec<String> = fs::read_to_string(&output)?
        .lines()
        .map(str::to_string)
        .collect();
    lines.sort();
    assert_eq!(lines, vec!["3, 10", "5, 20"]);
    Ok(())
}
