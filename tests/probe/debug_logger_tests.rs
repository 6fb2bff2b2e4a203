use crate::common::create_temp_dir;
use clientprobe::core::probe::debug_logger::{LogEntry, DEBUG_ENV_VAR};
use clientprobe::core::probe::{get_debug_logger, DebugLogger};
use serial_test::serial;
use std::env;
use std::fs;

fn read_entries(path: &std::path::Path) -> Vec<LogEntry> {
    fs::read_to_string(path)
        .expect("log file exists")
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid JSON line"))
        .collect()
}

#[test]
#[serial]
fn test_debug_logger_disabled_by_default() {
    env::remove_var(DEBUG_ENV_VAR);
    let logger = get_debug_logger();
    assert!(!logger.is_enabled());
}

#[test]
#[serial]
fn test_debug_logger_env_var_parsing() {
    let test_cases = vec![
        ("true", true),
        ("TRUE", true),
        ("1", true),
        ("yes", true),
        (" on ", true),
        ("false", false),
        ("0", false),
        ("invalid", false),
        ("", false),
    ];

    for (value, expected) in test_cases {
        env::set_var(DEBUG_ENV_VAR, value);
        let logger = DebugLogger::new();
        assert_eq!(logger.is_enabled(), expected, "Failed for value: {:?}", value);
    }

    env::remove_var(DEBUG_ENV_VAR);
}

#[test]
fn test_disabled_logger_writes_nothing() {
    let temp_dir = create_temp_dir();
    let log_path = temp_dir.path().join("probe.log");
    let logger = DebugLogger::with_path(false, log_path.clone());

    logger.debug_sync("Probe", "event", "message");
    logger.probe_start("ureq", "example.com", 10000);

    assert!(!log_path.exists());
}

#[test]
fn test_probe_events_written_as_json_lines() {
    let temp_dir = create_temp_dir();
    let log_path = temp_dir.path().join("nested").join("probe.log");
    let logger = DebugLogger::with_path(true, log_path.clone());

    logger.probe_start("isahc", "msearch.shopping.naver.com", 10000);
    logger.probe_end("isahc", "blocked", Some(403), 812, Some(1532));
    logger.summary(0, 3, 2400);

    let entries = read_entries(&log_path);
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0].level, "PROBE");
    assert_eq!(entries[0].event, "probe_start");
    assert_eq!(entries[0].fields["client"], "isahc");
    assert_eq!(entries[0].fields["timeout_ms"], 10000);

    assert_eq!(entries[1].event, "probe_end");
    assert_eq!(entries[1].fields["http_status"], 403);
    assert_eq!(entries[1].fields["bytes"], 1532);

    assert_eq!(entries[2].fields["success_count"], 0);
    assert_eq!(entries[2].fields["total"], 3);

    for entry in &entries {
        assert_eq!(entry.correlation_id.as_deref(), Some(logger.get_session_id()));
    }
    assert_eq!(logger.get_session_id().len(), 8);
}

#[test]
fn test_error_event_has_no_status_field() {
    let temp_dir = create_temp_dir();
    let log_path = temp_dir.path().join("probe.log");
    let logger = DebugLogger::with_path(true, log_path.clone());

    logger.error_sync("Probe", "probe_error", "curl: request failed: timed out");
    logger.probe_end("curl", "error", None, 10001, None);

    let entries = read_entries(&log_path);
    assert_eq!(entries[0].level, "ERROR");
    assert!(!entries[1].fields.contains_key("http_status"));
    assert!(!entries[1].fields.contains_key("bytes"));
}

#[test]
fn test_sensitive_values_redacted() {
    let temp_dir = create_temp_dir();
    let logger = DebugLogger::with_path(false, temp_dir.path().join("probe.log"));

    let redacted = logger.redact_sensitive_data("Authorization: Bearer abc123");
    assert!(redacted.contains("[REDACTED]"));
    assert!(!redacted.contains("abc123"));

    let redacted = logger.redact_sensitive_data("set-cookie: NNB=ABCDEF; path=/");
    assert!(!redacted.contains("NNB=ABCDEF"));

    let long_token = "a".repeat(120);
    assert_eq!(
        logger.redact_sensitive_data(&long_token),
        "[REDACTED_LONG_STRING_120chars]"
    );

    let plain = "ureq probe completed: success (120ms)";
    assert_eq!(logger.redact_sensitive_data(plain), plain);
}

#[test]
fn test_oversized_log_is_rotated_to_gzip() {
    let temp_dir = create_temp_dir();
    let log_path = temp_dir.path().join("probe.log");
    fs::write(&log_path, vec![b'x'; 9 * 1024 * 1024]).unwrap();

    let logger = DebugLogger::with_path(true, log_path.clone());
    logger.debug_sync("Main", "start", "after rotation");

    let archives: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("probe.") && name.ends_with(".gz"))
        .collect();
    assert_eq!(archives.len(), 1);

    let entries = read_entries(&log_path);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "after rotation");
}

#[test]
fn test_rotation_keeps_five_newest_archives() {
    let temp_dir = create_temp_dir();
    for day in 1..=6 {
        let old = temp_dir.path().join(format!("probe.2020010{}_000000.gz", day));
        fs::write(old, b"old").unwrap();
    }
    let log_path = temp_dir.path().join("probe.log");
    fs::write(&log_path, vec![b'x'; 9 * 1024 * 1024]).unwrap();

    let logger = DebugLogger::with_path(true, log_path);
    logger.debug_sync("Main", "start", "after rotation");

    let archives: Vec<String> = fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".gz"))
        .collect();
    assert_eq!(archives.len(), 5, "{:?}", archives);
    assert!(archives.iter().any(|name| !name.starts_with("probe.2020")));
    assert!(!temp_dir.path().join("probe.lock").exists());
}
