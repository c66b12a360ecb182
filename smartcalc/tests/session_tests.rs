/// Session tests: pipe input lines through the `smartcalc` binary and verify
/// what it prints.
///
/// Each case is a `(&str input, &[&str] expected_lines)` pair.  Stdin is not a
/// terminal here, so no banner is printed; the startup file is skipped with
/// `-f` unless a test supplies its own.

use std::io::Write;
use std::process::{Command, Output, Stdio};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Path to the `smartcalc` binary built by this Cargo workspace.
fn binary() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_smartcalc"))
}

/// Run the binary with `args`, feeding `input` on stdin.
fn run_with(args: &[&str], input: impl AsRef<[u8]>) -> Output {
    let mut child = Command::new(binary())
        .args(args)
        .env_remove("SMARTCALCRC")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn smartcalc binary");
    {
        let stdin = child.stdin.as_mut().expect("stdin not open");
        // The child may exit on `/exit` before draining its input.
        let _ = stdin.write_all(input.as_ref());
    }
    child.wait_with_output().expect("wait failed")
}

fn stdout_lines(out: &Output) -> Vec<String> {
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(str::to_owned)
        .collect()
}

/// Run `input` with no startup file and compare every stdout line, blank
/// separators included.
fn check(input: &str, expected: &[&str]) {
    let out = run_with(&["-f"], input);
    let got = stdout_lines(&out);
    let want: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    assert_eq!(
        got, want,
        "\n--- output mismatch ---\nInput:\n{input}\nGot:\n{got:#?}\nWant:\n{want:#?}\nStderr:\n{}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(out.status.success(), "exit status {:?}", out.status);
}

// ── Test cases ────────────────────────────────────────────────────────────────

#[test]
fn assign_evaluate_exit() {
    check("n=5\nn+3\n/exit\n", &["8", "", "Bye!"]);
}

#[test]
fn exit_stops_reading() {
    check("/exit\n1 + 1\n", &["Bye!"]);
}

#[test]
fn eof_ends_without_farewell() {
    check("2 + 2\n", &["4", ""]);
}

#[test]
fn power_and_integer_division() {
    check("4^2\n7/2\n/exit\n", &["16", "", "3", "", "Bye!"]);
}

#[test]
fn chained_assignment() {
    check("a=5\nb=a\nc=b\nc\n", &["5", ""]);
}

#[test]
fn every_error_message() {
    check(
        "a = 1 = 2\n\
         1a = 2\n\
         2a\n\
         ghost\n\
         5**2\n\
         /nope\n",
        &[
            "Invalid assignment", "",
            "Invalid identifier", "",
            "Invalid identifier", "",
            "Unknown variable", "",
            "Invalid expression", "",
            "Unknown command", "",
        ],
    );
}

#[test]
fn errors_do_not_end_session() {
    check("6//2\n6/2\n", &["Invalid expression", "", "3", ""]);
}

#[test]
fn long_flat_expression() {
    let sum = format!("1{}\n2+2\n", "+1".repeat(200_000));
    let out = run_with(&["-f"], &sum);
    assert_eq!(stdout_lines(&out), ["200001", "", "4", ""]);
    assert!(out.status.success(), "exit status {:?}", out.status);
}

#[test]
fn invalid_utf8_line_is_reported_and_skipped() {
    let out = run_with(&["-f"], b"1+1\n\xff\xfe\n2+2\n/exit\n");
    assert_eq!(
        stdout_lines(&out),
        ["2", "", "Invalid expression", "", "4", "", "Bye!"]
    );
    assert!(out.status.success(), "exit status {:?}", out.status);
}

#[test]
fn help_text() {
    let out = run_with(&["-f"], "/help\n");
    let lines = stdout_lines(&out);
    assert_eq!(lines.first().map(String::as_str), Some("This program evaluates mathematical expressions."));
    assert!(lines.iter().any(|l| l == "^: power"));
    assert_eq!(lines.last().map(String::as_str), Some(""));
}

#[test]
fn command_line_lines_run_first() {
    let out = run_with(&["-f", "-cx=6", "-c", "x*7"], "x+1\n");
    assert_eq!(stdout_lines(&out), ["42", "", "7", ""]);
}

#[test]
fn command_line_exit_skips_stdin() {
    let out = run_with(&["-f", "-c/exit"], "1+1\n");
    assert_eq!(stdout_lines(&out), ["Bye!"]);
    assert!(out.status.success());
}

#[test]
fn startup_file_preloads_variables() {
    let dir = tempfile::tempdir().unwrap();
    let rc = dir.path().join("calcrc");
    std::fs::write(&rc, "; constants\nanswer = 42\nbad1 = 3\n").unwrap();

    let flag = format!("-f{}", rc.display());
    let out = run_with(&[flag.as_str()], "answer / 2\n");
    assert_eq!(stdout_lines(&out), ["21", ""]);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("line 3: Invalid identifier"), "stderr: {stderr}");
}

#[test]
fn startup_file_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let rc = dir.path().join("env.calcrc");
    std::fs::write(&rc, "k = 3\n").unwrap();

    let out = Command::new(binary())
        .env("SMARTCALCRC", &rc)
        .stdin(Stdio::null())
        .arg("-ck ^ 3")
        .output()
        .expect("failed to run smartcalc");
    assert_eq!(stdout_lines(&out), ["27", ""]);
}

#[test]
fn missing_startup_file_is_a_warning() {
    let out = run_with(&["-f", "/nonexistent/calcrc"], "1+1\n");
    assert_eq!(stdout_lines(&out), ["2", ""]);
    assert!(String::from_utf8_lossy(&out.stderr).contains("warning"));
}

#[test]
fn debug_traces_to_stderr_only() {
    let out = run_with(&["-f", "-d"], "1 // 0\n");
    assert_eq!(stdout_lines(&out), ["Invalid expression", ""]);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("smartcalc: debug: route"), "stderr: {stderr}");
}

#[test]
fn debug_reports_evaluator_cause() {
    let out = run_with(&["-f", "-d"], "1 / 0\n");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("smartcalc: debug: evaluator: division by zero"),
        "stderr: {stderr}"
    );
}

#[test]
fn bad_flag_fails_with_usage() {
    let out = run_with(&["-z"], "");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage: smartcalc"));
}
