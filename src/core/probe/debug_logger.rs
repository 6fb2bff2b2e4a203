use std::collections::HashMap;
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::SystemTime;

use chrono::Local;
use flate2::{write::GzEncoder, Compression};
use fs2::FileExt;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MAX_LOG_BYTES: u64 = 8 * 1024 * 1024;
const MAX_ARCHIVES: usize = 5;
const ROTATION_CHECK_INTERVAL: u32 = 200;

/// Env switch for the debug log
pub const DEBUG_ENV_VAR: &str = "CLIENTPROBE_DEBUG";

/// Keys whose values never reach the log: request/response headers and
/// anything token-like that a client error message might echo back
const REDACTED_KEYS: &str =
    r"(?i)(proxy-authorization|authorization|bearer|set-cookie|cookie|x-api-key|api[_-]?key|token|password|secret)[:=\s]+[^\n]+";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,                            // ISO-8601 with timezone
    pub level: String,                                // DEBUG, ERROR, PERF, PROBE
    pub component: String,
    pub event: String,
    pub message: String,                              // redacted
    pub correlation_id: Option<String>,
    pub fields: HashMap<String, serde_json::Value>,
}

/// Append-only log file, gzipped aside once it passes `MAX_LOG_BYTES`
struct LogFile {
    path: PathBuf,
    writes: AtomicU32,
}

impl LogFile {
    fn open(path: PathBuf) -> Self {
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        Self {
            path,
            writes: AtomicU32::new(0),
        }
    }

    fn append(&self, line: &str) -> io::Result<()> {
        if self.writes.fetch_add(1, Ordering::Relaxed) % ROTATION_CHECK_INTERVAL == 0 {
            let _ = self.rotate();
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }

    fn is_oversized(&self) -> bool {
        fs::metadata(&self.path)
            .map(|meta| meta.len() >= MAX_LOG_BYTES)
            .unwrap_or(false)
    }

    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "clientprobe-debug".to_string())
    }

    /// Only one process rotates; the others skip and keep appending
    fn rotate(&self) -> io::Result<()> {
        if !self.is_oversized() {
            return Ok(());
        }

        let lock_path = self.path.with_extension("lock");
        let lock = File::create(&lock_path)?;
        if lock.try_lock_exclusive().is_err() {
            return Ok(());
        }

        let result = if self.is_oversized() {
            self.archive().and_then(|()| self.prune())
        } else {
            Ok(())
        };
        let _ = fs::remove_file(&lock_path);
        result
    }

    fn archive(&self) -> io::Result<()> {
        let staged = self.path.with_extension("rotating");
        fs::rename(&self.path, &staged)?;

        let archive_name = format!("{}.{}.gz", self.stem(), Local::now().format("%Y%m%d_%H%M%S"));
        let mut encoder = GzEncoder::new(
            File::create(self.dir().join(archive_name))?,
            Compression::default(),
        );
        io::copy(&mut File::open(&staged)?, &mut encoder)?;
        encoder.finish()?;

        fs::remove_file(&staged)
    }

    /// Keep the newest `MAX_ARCHIVES` archives
    fn prune(&self) -> io::Result<()> {
        let prefix = format!("{}.", self.stem());
        let mut archives: Vec<(SystemTime, PathBuf)> = fs::read_dir(self.dir())?
            .filter_map(Result::ok)
            .filter(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                name.starts_with(&prefix) && name.ends_with(".gz")
            })
            .filter_map(|entry| Some((entry.metadata().ok()?.modified().ok()?, entry.path())))
            .collect();

        archives.sort();
        let excess = archives.len().saturating_sub(MAX_ARCHIVES);
        for (_, path) in archives.into_iter().take(excess) {
            let _ = fs::remove_file(path);
        }
        Ok(())
    }
}

/// JSON-lines debug logger, silent unless `CLIENTPROBE_DEBUG` is truthy
pub struct DebugLogger {
    file: Option<LogFile>,
    session_id: String,
    redaction: Option<Regex>,
}

impl Default for DebugLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugLogger {
    pub fn new() -> Self {
        Self::with_path(Self::parse_debug_enabled(), Self::get_log_path())
    }

    /// Logger writing to an explicit path, used by tests
    pub fn with_path(enabled: bool, log_path: PathBuf) -> Self {
        Self {
            file: enabled.then(|| LogFile::open(log_path)),
            session_id: Uuid::new_v4().to_string()[..8].to_string(),
            redaction: Regex::new(REDACTED_KEYS).ok(),
        }
    }

    /// Supports: true/false, 1/0, yes/no, on/off (case insensitive)
    fn parse_debug_enabled() -> bool {
        env::var(DEBUG_ENV_VAR)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
            .unwrap_or(false)
    }

    fn get_log_path() -> PathBuf {
        let mut log_path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        log_path.push(".clientprobe");
        log_path.push("clientprobe-debug.log");
        log_path
    }

    pub fn redact_sensitive_data(&self, text: &str) -> String {
        let redacted = match &self.redaction {
            Some(regex) => regex.replace_all(text, "$1: [REDACTED]").to_string(),
            None => text.to_string(),
        };

        let looks_like_token = redacted.len() > 100
            && redacted
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if looks_like_token {
            return format!("[REDACTED_LONG_STRING_{}chars]", redacted.len());
        }

        redacted
    }

    fn log_sync(
        &self,
        level: &str,
        component: &str,
        event: &str,
        message: &str,
        correlation_id: Option<String>,
        fields: HashMap<String, serde_json::Value>,
    ) {
        let Some(file) = &self.file else {
            return;
        };

        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            level: level.to_string(),
            component: component.to_string(),
            event: event.to_string(),
            message: self.redact_sensitive_data(message),
            correlation_id: correlation_id.or_else(|| Some(self.session_id.clone())),
            fields,
        };

        // Logging never fails the probe run
        if let Ok(json_line) = serde_json::to_string(&entry) {
            let _ = file.append(&json_line);
        }
    }

    pub fn debug_sync(&self, component: &str, event: &str, message: &str) {
        self.log_sync("DEBUG", component, event, message, None, HashMap::new());
    }

    pub fn error_sync(&self, component: &str, event: &str, message: &str) {
        self.log_sync("ERROR", component, event, message, None, HashMap::new());
    }

    pub fn performance_sync(&self, component: &str, operation: &str, duration_ms: u64) {
        let mut fields = HashMap::new();
        fields.insert("duration_ms".to_string(), duration_ms.into());

        self.log_sync("PERF", component, "operation_complete", operation, None, fields);
    }

    pub fn probe_start(&self, client: &str, host: &str, timeout_ms: u64) {
        let mut fields = HashMap::new();
        fields.insert("client".to_string(), client.into());
        fields.insert("host".to_string(), host.into());
        fields.insert("timeout_ms".to_string(), timeout_ms.into());

        self.log_sync(
            "PROBE",
            "Probe",
            "probe_start",
            &format!("Starting {} probe against {}", client, host),
            None,
            fields,
        );
    }

    pub fn probe_end(
        &self,
        client: &str,
        outcome: &str,
        http_status: Option<u16>,
        duration_ms: u64,
        body_len: Option<u64>,
    ) {
        let mut fields = HashMap::new();
        fields.insert("client".to_string(), client.into());
        fields.insert("outcome".to_string(), outcome.into());
        fields.insert("duration_ms".to_string(), duration_ms.into());
        if let Some(code) = http_status {
            fields.insert("http_status".to_string(), code.into());
        }
        if let Some(len) = body_len {
            fields.insert("bytes".to_string(), len.into());
        }

        self.log_sync(
            "PROBE",
            "Probe",
            "probe_end",
            &format!("{} probe completed: {} ({}ms)", client, outcome, duration_ms),
            None,
            fields,
        );
    }

    pub fn summary(&self, success_count: usize, total: usize, duration_ms: u64) {
        let mut fields = HashMap::new();
        fields.insert("success_count".to_string(), success_count.into());
        fields.insert("total".to_string(), total.into());
        fields.insert("duration_ms".to_string(), duration_ms.into());

        self.log_sync(
            "PROBE",
            "Report",
            "summary",
            &format!("{}/{} clients got HTTP 200", success_count, total),
            None,
            fields,
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn get_session_id(&self) -> &str {
        &self.session_id
    }
}

pub fn get_debug_logger() -> DebugLogger {
    DebugLogger::new()
}
