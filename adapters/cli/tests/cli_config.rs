use std::{fs, process::Command};

use tempfile::TempDir;

fn write_config(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("session.toml");
    fs::write(&path, contents).expect("write config");
    (dir, path)
}

#[test]
fn session_file_drives_the_run() {
    let (_dir, path) = write_config(
        r#"
        columns = 5
        rows = 5
        seeker = [0, 0]
        target = [0, 4]
        tick_ms = 50
        keys = ["fire"]
        "#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_pursuit"))
        .arg("--config")
        .arg(&path)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run pursuit binary");

    assert!(output.status.success(), "pursuit exited with {}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("seeker shot down after 1 ticks"), "{stdout}");
    assert_eq!(stdout.lines().count(), 6, "five grid rows plus the outcome");
}

#[test]
fn flags_override_the_session_file() {
    let (_dir, path) = write_config("columns = 5\nrows = 5\ntarget = [0, 4]\n");

    let output = Command::new(env!("CARGO_BIN_EXE_pursuit"))
        .arg("--config")
        .arg(&path)
        .args(["--rows", "3", "--target", "2,2"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run pursuit binary");

    assert!(output.status.success(), "pursuit exited with {}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("seeker caught the target"), "{stdout}");
    assert_eq!(stdout.lines().count(), 4, "three grid rows plus the outcome");
}

#[test]
fn unknown_setting_is_reported() {
    let (_dir, path) = write_config("speed = 3\n");

    let output = Command::new(env!("CARGO_BIN_EXE_pursuit"))
        .arg("--config")
        .arg(&path)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run pursuit binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid session config"), "{stderr}");
}
