#![cfg(all(unix, feature = "cli"))]

use std::process::{Command, Output};

fn osdlink(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_osdlink"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .env_remove("OSDLINK_PORT")
        .env_remove("OSDLINK_BAUD")
        .output()
        .expect("osdlink should run")
}

#[test]
fn encode_raw_prints_golden_frame() {
    let output = osdlink(&["--format", "raw", "encode"]);

    assert!(output.status.success());
    assert_eq!(
        output.stdout,
        b"$PCCOM,06,p,00,03,03,01,01,00,78,00,0F*71\r\n".to_vec()
    );
}

#[test]
fn encode_json_reports_checksum_and_size() {
    let output = osdlink(&["--format", "json", "encode", "--payload", "p,11"]);

    assert!(output.status.success());
    let line = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("stdout should be json");
    assert_eq!(value["kind"], "frame");
    assert_eq!(value["payload"], "p,11");
    assert_eq!(value["checksum"], "4");
    assert_eq!(value["size"], 18);
    assert_eq!(value["wire"], "$PCCOM,06,p,11*4\\r\\n");
}

#[test]
fn encode_pretty_shows_text_and_hex() {
    let output = osdlink(&["--format", "pretty", "encode", "--profile", "ardupilot-115200"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("$PCCOM,06,p,00,03,03,01,01,00,78,00,0F*71\\r\\n [24 50 43 43 4f 4d"));
    assert!(stdout.trim_end().ends_with("37 31 0d 0a]"));
}

#[test]
fn unknown_profile_is_a_usage_error() {
    let output = osdlink(&["encode", "--profile", "betaflight"]);

    assert_eq!(output.status.code(), Some(64));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown profile 'betaflight'"));
}

#[test]
fn configure_on_missing_port_is_a_transport_error() {
    let output = osdlink(&[
        "configure",
        "--port",
        "/dev/osdlink-missing-port",
        "--listen",
        "100ms",
    ]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("open failed"));
    assert!(stderr.contains("/dev/osdlink-missing-port"));
}

#[test]
fn monitor_rejects_bad_duration_before_opening_port() {
    let output = osdlink(&["monitor", "--port", "/dev/osdlink-missing-port", "--duration", "0s"]);

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_prints_package_version() {
    let output = osdlink(&["version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("osdlink {}", env!("CARGO_PKG_VERSION")));
}
