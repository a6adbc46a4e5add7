#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

fn gplink(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gplink"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("gplink should run")
}

fn unique_temp_file(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "gplink-cli-{tag}-{}-{}.bin",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ))
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn encode_stop_prints_full_frame_hex() {
    let output = gplink(&["--format", "json", "encode", "stop", "3"]);

    assert!(output.status.success());
    let expected = format!("\"hex\":\"0103{}\"", "00".repeat(62));
    let out = stdout(&output);
    assert!(out.contains(&expected), "unexpected output: {out}");
    assert!(out.contains("\"opcode_name\":\"STOP\""));
}

#[test]
fn encode_raw_writes_frame_bytes() {
    let output = gplink(&[
        "--format",
        "raw",
        "encode",
        "auto-switcher",
        "2",
        "--off-time",
        "258",
        "--on-time",
        "772",
        "--count",
        "5",
    ]);

    assert!(output.status.success());
    assert_eq!(output.stdout.len(), 64);
    assert_eq!(&output.stdout[..10], &[4, 2, 2, 1, 4, 3, 5, 0, 0, 0]);
}

#[test]
fn encode_rejects_oversized_module_request() {
    let output = gplink(&["encode", "get-module", "0", "--len", "21"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn decode_data_frame_reports_event() {
    let output = gplink(&["--format", "json", "decode", "00 02 00 0300 010203"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("\"outcome\":\"event\""), "unexpected output: {out}");
    assert!(out.contains("\"event\":\"data8\""));
    assert!(out.contains("\"channel\":2"));
    assert!(out.contains("\"values\":[1,2,3]"));
}

#[test]
fn decode_unknown_opcode_is_ignored_unless_strict() {
    let lenient = gplink(&["--format", "json", "decode", "05"]);
    assert!(lenient.status.success());
    assert!(stdout(&lenient).contains("\"reason\":\"unknown opcode 0x05\""));

    let strict = gplink(&["--format", "json", "--strict", "decode", "05"]);
    assert_eq!(strict.status.code(), Some(60));
}

#[test]
fn decode_oversized_buffer_is_data_invalid() {
    let hex = "00".repeat(65);
    let output = gplink(&["decode", hex.as_str()]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn decode_count_past_received_bytes_is_data_invalid() {
    // count says 4 data bytes, only one was received
    let output = gplink(&["decode", "00 00 00 0400 aa"]);
    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("short frame"));
}

#[test]
fn decode_bad_hex_is_usage_error() {
    let output = gplink(&["decode", "0g"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn encode_out_then_listen_reads_frames_back() {
    let path = unique_temp_file("listen");
    let path_arg = path.to_string_lossy().into_owned();
    let path_arg = path_arg.as_str();

    for args in [
        vec!["encode", "stop", "1", "--out", path_arg],
        vec!["encode", "get-module", "1", "--len", "2", "--out", path_arg],
        vec!["encode", "data", "4", "--tag", "16", "10002000", "--out", path_arg],
    ] {
        let output = gplink(&args);
        assert!(output.status.success(), "{args:?} failed");
        assert!(output.stdout.is_empty());
    }

    let output = gplink(&["--format", "json", "listen", path_arg]);
    let _ = std::fs::remove_file(&path);

    assert!(output.status.success());
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3, "unexpected output: {out}");
    assert!(lines[0].contains("\"reason\":\"STOP has no receive event\""));
    assert!(lines[1].contains("\"event\":\"rgb_cap_module_data\""));
    assert!(lines[2].contains("\"event\":\"data16\""));
    assert!(lines[2].contains("\"values\":[16,32]"));
}

#[test]
fn listen_stops_after_count() {
    let path = unique_temp_file("count");
    let path_arg = path.to_string_lossy().into_owned();
    let path_arg = path_arg.as_str();
    for channel in ["0", "1", "2"] {
        assert!(gplink(&["encode", "clockwise", channel, "--out", path_arg])
            .status
            .success());
    }

    let output = gplink(&["--format", "pretty", "listen", path_arg, "--count", "2"]);
    let _ = std::fs::remove_file(&path);

    assert!(output.status.success());
    assert_eq!(stdout(&output).lines().count(), 2);
}

#[test]
fn listen_missing_file_fails() {
    let path = unique_temp_file("missing");
    let path_arg = path.to_string_lossy();
    let output = gplink(&["listen", &*path_arg]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn version_prints_name() {
    let output = gplink(&["version"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("gplink "));
}
