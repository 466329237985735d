use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn terminates_from_argument() {
    let mut cmd = Command::cargo_bin("aliquot").unwrap();
    cmd.arg("8").arg("--no-plot");

    cmd.assert().success().stdout(
        predicate::str::contains(format!("{:>21} {:>21} ", "7", "1"))
            .and(predicate::str::contains("There were 2 terms. Maximum was:"))
            .and(predicate::str::contains("Stopped after").not()),
    );
}

#[test]
fn prompts_for_starting_number() {
    let mut cmd = Command::cargo_bin("aliquot").unwrap();
    cmd.arg("--no-plot").write_stdin("12\n");

    cmd.assert().success().stdout(
        predicate::str::starts_with("Please input a starting number: ")
            .and(predicate::str::contains("There were 6 terms."))
            .and(predicate::str::contains(format!("Maximum was: {:>16}", "16"))),
    );
}

#[test]
fn special_number_is_capped() {
    let mut cmd = Command::cargo_bin("aliquot").unwrap();
    cmd.arg("276").arg("--no-plot");

    cmd.assert().success().stdout(
        predicate::str::contains("There were 81 terms.")
            .and(predicate::str::contains("276 is a special number")),
    );
}

#[test]
fn custom_special_set() {
    let mut cmd = Command::cargo_bin("aliquot").unwrap();
    cmd.args(["138", "--special", "138,150", "--special-cap", "3", "--no-plot"]);

    cmd.assert().success().stdout(
        predicate::str::contains("There were 3 terms.")
            .and(predicate::str::contains("138 is a special number")),
    );
}

#[test]
fn perfect_number_reports_non_termination() {
    let mut cmd = Command::cargo_bin("aliquot").unwrap();
    cmd.args(["6", "--max-steps", "1000", "--no-plot"]);

    cmd.assert().success().stdout(
        predicate::str::contains("There were 1000 terms.")
            .and(predicate::str::contains("non-terminating, exceeded iteration bound")),
    );
}

#[test]
fn rejects_invalid_input() {
    let mut cmd = Command::cargo_bin("aliquot").unwrap();
    cmd.arg("--no-plot").write_stdin("twelve\n");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid text(twelve)"));

    let mut cmd = Command::cargo_bin("aliquot").unwrap();
    cmd.args(["0", "--no-plot"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid starting number(0)"));
}

#[test]
fn writes_plot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aliquot.png");

    let mut cmd = Command::cargo_bin("aliquot").unwrap();
    cmd.arg("12").arg("--plot").arg(&path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Plot of log10(term) by step written to"));
    assert!(path.is_file());
}

#[test]
fn one_skips_plot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aliquot.png");

    let mut cmd = Command::cargo_bin("aliquot").unwrap();
    cmd.arg("1").arg("--plot").arg(&path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("There were 0 terms."));
    assert!(!path.exists());
}

#[test]
fn eight_terms_per_line_by_default() {
    let mut cmd = Command::cargo_bin("aliquot").unwrap();
    cmd.args(["138", "--no-plot"]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();
    let first_line = text.lines().next().unwrap();
    assert_eq!(first_line.len(), 8 * 22);
    assert!(first_line.starts_with(&format!("{:>21} {:>21} ", "150", "222")));
    assert!(text.contains("There were 177 terms."));
    assert!(text.contains("179,931,895,322"));
}

#[test]
fn full_row_leaves_blank_line_before_summary() {
    let mut cmd = Command::cargo_bin("aliquot").unwrap();
    cmd.args(["6", "--max-steps", "8", "--no-plot"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(" \n\nThere were 8 terms."));
}

#[test]
fn columns_flag_changes_row_width() {
    let mut cmd = Command::cargo_bin("aliquot").unwrap();
    cmd.args(["12", "--columns", "3", "--no-plot"]);

    cmd.assert().success().stdout(predicate::str::starts_with(format!(
        "{:>21} {:>21} {:>21} \n{:>21} {:>21} {:>21} \n\nThere were 6 terms.",
        "16", "15", "9", "4", "3", "1"
    )));
}

#[test]
fn overflow_ends_partial_row() {
    let mut cmd = Command::cargo_bin("aliquot").unwrap();
    cmd.args(["876240758958364800", "--no-plot"]);

    cmd.assert()
        .failure()
        .stdout(predicate::str::diff(format!("{:>21} \n", "4,749,490,691,184,355,200")))
        .stderr(predicate::str::contains("doesn't fit in 64 bits"));
}
