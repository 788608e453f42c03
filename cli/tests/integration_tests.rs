use std::io::Write;
use std::process::{Command, Stdio};

/// Feeds `input` to a quiet REPL and returns its stdout.
fn repl(input: &str) -> String {
    let mut child = Command::new(env!("CARGO_BIN_EXE_optdispatch-repl"))
        .arg("--quiet")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to run optdispatch-repl");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");

    let output = child.wait_with_output().expect("failed to wait for repl");
    assert!(output.status.success(), "repl should exit cleanly at EOF");
    String::from_utf8(output.stdout).expect("stdout is utf-8")
}

// ---------------------------------------------------------------------------
// Session tests
// ---------------------------------------------------------------------------

#[test]
fn write_then_read_prints_stored_value() {
    assert_eq!(repl("-w hello\n-r\n"), "hello\n");
}

#[test]
fn default_action_reads_value() {
    assert_eq!(repl("-w stored\nleading words\n"), "stored\n");
}

#[test]
fn help_runs_before_read() {
    let out = repl("-r --help\n");
    assert!(out.starts_with("Commands:"));
    assert!(out.contains("--help      show this message"));
    assert_eq!(out.lines().count(), 4);
}

#[test]
fn blank_line_prints_hint() {
    assert_eq!(repl("\n   \n"), "nothing to do, type --help for commands\n".repeat(2));
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[test]
fn diagnostics_do_not_end_the_session() {
    let out = repl("-w keep\n-z\n-w\n-w a b\n-r\n");
    assert_eq!(
        out,
        "invalid option -- '-z'\nMissingArgument: -w\nUnexpectedArgument: b\nkeep\n"
    );
}

#[test]
fn prompt_is_printed_unless_quiet() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_optdispatch-repl"))
        .args(["--prompt", "$ "])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to run optdispatch-repl");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(b"-w x -r\n")
        .expect("failed to write stdin");
    let output = child.wait_with_output().expect("failed to wait for repl");

    assert_eq!(String::from_utf8_lossy(&output.stdout), "$ x\n$ ");
}
