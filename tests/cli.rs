use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const DEMO_OUTPUT: &str = "\
--- Calyx Levenshtein Demo ---
Levenshtein distance between 'kitten' and 'sitting' is: 3
Levenshtein distance between 'saturday' and 'sunday' is: 3
Levenshtein distance between 'rosettacode' and 'raisethysword' is: 8
Levenshtein distance between 'test' and 'test' is: 0
Levenshtein distance between 'apple' and 'apply' is: 1
--- End of Demo ---
";

#[test]
fn calyx_run_levenshtein_demo() {
    let mut cmd = Command::cargo_bin("calyx").expect("binary exists");
    cmd.arg("run").arg("demos/levenshtein.cx");
    cmd.assert().success().stdout(DEMO_OUTPUT);
}

#[test]
fn calyx_run_hello() {
    let mut cmd = Command::cargo_bin("calyx").expect("binary exists");
    cmd.arg("run").arg("demos/hello.cx");
    cmd.assert().success().stdout("Hello from Calyx!\n");
}

#[test]
fn run_prints_native_distance() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("distance.cx");
    fs::write(&script, "print(calculateLevenshteinInC(\"flaw\", \"lawn\"))")
        .expect("write script");

    let mut cmd = Command::cargo_bin("calyx").expect("binary exists");
    cmd.arg("run").arg(&script);
    cmd.assert().success().stdout("2\n");
}

#[test]
fn print_with_no_arguments_emits_blank_line() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("blank.cx");
    fs::write(&script, "print()").expect("write script");

    let mut cmd = Command::cargo_bin("calyx").expect("binary exists");
    cmd.arg("run").arg(&script);
    cmd.assert().success().stdout("\n");
}

#[test]
fn print_joins_mixed_arguments() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("mixed.cx");
    fs::write(&script, "print(1, \"two\", true, none)").expect("write script");

    let mut cmd = Command::cargo_bin("calyx").expect("binary exists");
    cmd.arg("run").arg(&script);
    cmd.assert().success().stdout("1 two true unit\n");
}

#[test]
fn missing_script_fails_with_load_error() {
    let mut cmd = Command::cargo_bin("calyx").expect("binary exists");
    cmd.arg("run").arg("demos/absent.cx");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to load"));
}

#[test]
fn script_error_is_reported_but_exit_is_clean() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("misuse.cx");
    fs::write(&script, "calculateLevenshteinInC(\"only\")").expect("write script");

    let mut cmd = Command::cargo_bin("calyx").expect("binary exists");
    cmd.arg("run").arg(&script);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("expected 2 arguments but received 1"));
}

#[test]
fn calyx_eval_snippet() {
    let mut cmd = Command::cargo_bin("calyx").expect("binary exists");
    cmd.arg("eval").arg("1 + 2 + 3");
    cmd.assert().success();
}

#[test]
fn calyx_eval_reports_errors() {
    let mut cmd = Command::cargo_bin("calyx").expect("binary exists");
    cmd.arg("eval").arg("missing + 1");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("undefined variable"));
}

#[test]
fn repl_echoes_values_and_quits() {
    let mut cmd = Command::cargo_bin("calyx").expect("binary exists");
    cmd.arg("repl").write_stdin("1 + 1\nvar x = 20\nx * 2\n:quit\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2").and(predicate::str::contains("40")));
}

#[test]
fn repl_stays_quiet_after_print() {
    // Only the printed line appears: no startup banner before it and
    // no `unit` echo after it.
    let mut cmd = Command::cargo_bin("calyx").expect("binary exists");
    cmd.arg("repl").write_stdin("print(\"hi\")\n");
    cmd.assert().success().stdout(
        predicate::str::contains("hi")
            .and(predicate::str::contains("unit").not())
            .and(predicate::str::contains("Calyx").not()),
    );
}

#[test]
fn repl_reports_errors_and_continues() {
    let mut cmd = Command::cargo_bin("calyx").expect("binary exists");
    cmd.arg("repl").write_stdin("missing + 1\n2 + 2\n:quit\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("4"))
        .stderr(predicate::str::contains("undefined variable"));
}
