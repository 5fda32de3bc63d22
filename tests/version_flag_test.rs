use std::process::Command;

#[test]
fn test_version_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_courtside"))
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    assert!(
        output.status.success(),
        "Version flag should exit with code 0"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout.trim().strip_prefix("courtside ").unwrap_or("");
    assert_eq!(
        version,
        env!("CARGO_PKG_VERSION"),
        "Binary version should match CARGO_PKG_VERSION"
    );
}

#[test]
fn test_version_flag_needs_no_configuration() {
    // Runs before the schedule URL is required
    let output = Command::new(env!("CARGO_BIN_EXE_courtside"))
        .arg("--version")
        .env_remove("COURTSIDE_SCHEDULE_URL")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
}
