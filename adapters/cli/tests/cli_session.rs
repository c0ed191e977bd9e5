use std::process::Command;

#[test]
fn cli_plays_a_short_session() {
    let output = Command::new(env!("CARGO_BIN_EXE_waypoint-defence"))
        .args(["--frames", "120", "--report-every", "60", "--tower", "300,170"])
        .output()
        .expect("failed to run waypoint-defence");

    assert!(output.status.success(), "waypoint-defence should exit cleanly");

    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "two HUD reports and a summary: {stdout}");
    assert!(lines[0].starts_with("[frame     60] gold 100 | lives 20 | wave 1/8"));
    assert!(lines[2].starts_with("gold "));
}

#[test]
fn cli_rejects_malformed_tower() {
    let output = Command::new(env!("CARGO_BIN_EXE_waypoint-defence"))
        .args(["--tower", "300"])
        .output()
        .expect("failed to run waypoint-defence");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("expected X,Y"), "unexpected stderr: {stderr}");
}
