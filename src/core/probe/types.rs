// Core types for client probing
use std::fmt;

/// HTTP client implementations under comparison, in probe order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientKind {
    /// Simple blocking client on rustls
    Ureq,
    /// libcurl-backed client with HTTP/2 negotiation
    Isahc,
    /// Raw libcurl easy handle
    Curl,
}

impl ClientKind {
    /// Fixed probe order
    pub const ALL: [ClientKind; 3] = [ClientKind::Ureq, ClientKind::Isahc, ClientKind::Curl];

    pub fn name(&self) -> &'static str {
        match self {
            ClientKind::Ureq => "ureq",
            ClientKind::Isahc => "isahc",
            ClientKind::Curl => "curl",
        }
    }

    /// Cargo feature that compiles this client in
    pub fn feature(&self) -> &'static str {
        match self {
            ClientKind::Ureq => "client-ureq",
            ClientKind::Isahc => "client-isahc",
            ClientKind::Curl => "client-curl",
        }
    }

    /// Whether this build carries the client at all
    pub fn is_available(&self) -> bool {
        match self {
            ClientKind::Ureq => cfg!(feature = "client-ureq"),
            ClientKind::Isahc => cfg!(feature = "client-isahc"),
            ClientKind::Curl => cfg!(feature = "client-curl"),
        }
    }

    /// One-based position in the probe sequence
    pub fn position(&self) -> usize {
        match self {
            ClientKind::Ureq => 1,
            ClientKind::Isahc => 2,
            ClientKind::Curl => 3,
        }
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Completed response as seen by a probe client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP status code, any value including non-200
    pub status: u16,
    /// Response body length in bytes
    pub body_len: u64,
}

/// Tri-state probe result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeOutcome {
    /// Client not compiled into this build
    #[default]
    NotInstalled,
    /// Request completed with this status
    Status(u16),
    /// Request failed before a status was available
    Error,
}

impl ProbeOutcome {
    /// Sentinel view: None when not installed, Some(0) on error, Some(code) otherwise
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProbeOutcome::NotInstalled => None,
            ProbeOutcome::Status(code) => Some(*code),
            ProbeOutcome::Error => Some(0),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Status(200))
    }

    /// Classification text used in the results table
    pub fn status_text(&self) -> String {
        match self {
            ProbeOutcome::NotInstalled => "not installed".to_string(),
            ProbeOutcome::Status(200) => "SUCCESS HTTP 200".to_string(),
            ProbeOutcome::Error => "ERROR".to_string(),
            ProbeOutcome::Status(code) => format!("FAILED HTTP {}", code),
        }
    }

    /// Short label for log fields
    pub fn label(&self) -> &'static str {
        match self {
            ProbeOutcome::NotInstalled => "not_installed",
            ProbeOutcome::Status(200) => "success",
            ProbeOutcome::Status(_) => "blocked",
            ProbeOutcome::Error => "error",
        }
    }
}

/// Failures inside a probe client; always reduced to `ProbeOutcome::Error`
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("request creation failed: {0}")]
    Request(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("unexpected status code {0}")]
    InvalidStatus(u32),
}
