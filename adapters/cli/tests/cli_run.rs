use std::process::Command;

#[test]
fn small_open_board_reports_a_catch() {
    let output = Command::new(env!("CARGO_BIN_EXE_pursuit"))
        .args(["--columns", "5", "--rows", "5", "--seeker", "0,0", "--target", "4,4"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run pursuit binary");

    assert!(output.status.success(), "pursuit exited with {}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("seeker caught the target"), "{stdout}");
    assert_eq!(stdout.lines().count(), 6, "five grid rows plus the outcome");
}

#[test]
fn overlapping_roles_fail() {
    let status = Command::new(env!("CARGO_BIN_EXE_pursuit"))
        .args(["--seeker", "2,2", "--target", "2,2"])
        .env("RUST_LOG", "off")
        .status()
        .expect("failed to run pursuit binary");

    assert!(!status.success());
}

#[test]
fn key_script_steers_the_target() {
    let output = Command::new(env!("CARGO_BIN_EXE_pursuit"))
        .args([
            "--columns", "5", "--rows", "5", "--seeker", "0,0", "--target", "2,2",
            "--difficulty", "relaxed", "--max-ticks", "3", "--tick-ms", "50", "--keys",
            "+s,+d,-s",
        ])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run pursuit binary");

    assert!(output.status.success(), "pursuit exited with {}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("gave up after 3 ticks"), "{stdout}");
    let bottom = stdout.lines().nth(4).expect("five grid rows");
    assert_eq!(bottom.chars().nth(4), Some('T'), "{stdout}");
}

#[test]
fn malformed_key_script_fails() {
    let status = Command::new(env!("CARGO_BIN_EXE_pursuit"))
        .args(["--keys", "jump"])
        .env("RUST_LOG", "off")
        .status()
        .expect("failed to run pursuit binary");

    assert!(!status.success());
}
