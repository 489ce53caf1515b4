use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const DATE: &str = "2026-10-18";

fn dexle(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dexle"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--date", DATE])
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("run dexle")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn guesses_persist_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let first = dexle(dir.path(), &["guess", "Bulbasaur", "Squirtle"]);
    assert!(first.status.success());
    assert!(dir.path().join("session.json").exists());

    let share = dexle(dir.path(), &["share"]);
    let text = stdout(&share);
    assert!(text.starts_with(&format!("Dexle {DATE}")));
    assert!(text.contains("(2)"));
    assert!(!text.contains("Bulbasaur"));

    let duplicate = dexle(dir.path(), &["guess", "bulbasaur"]);
    assert!(duplicate.status.success());
    assert!(stdout(&duplicate).contains("already guessed"));
}

#[test]
fn stats_json_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let output = dexle(dir.path(), &["stats", "--json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["daily"]["gamesPlayed"], 0);
    assert_eq!(value["freePlay"]["gamesPlayed"], 0);
}

#[test]
fn interactive_session_reads_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_dexle"))
        .arg("--data-dir")
        .arg(dir.path())
        .args(["--date", DATE, "play"])
        .env("NO_COLOR", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn dexle");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"?pika\n:free\n:quit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Pikachu"));
    assert!(text.contains("free play unlocks after"));
}

#[test]
fn missing_catalog_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let output = dexle(
        dir.path(),
        &["--catalog", "/definitely/not/here.json", "stats"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("catalog unavailable"));
}

#[test]
fn corrupt_stats_file_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("daily-stats.json"), "garbage").unwrap();
    let output = dexle(dir.path(), &["stats"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Played:         0"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not read daily statistics"));
}
