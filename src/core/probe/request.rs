//! Fixed request descriptor shared by every probe.

use crate::core::probe::types::ProbeError;
use std::time::Duration;
use url::Url;

/// Endpoint whose bot detection is being examined
pub const TARGET_URL: &str =
    "https://msearch.shopping.naver.com/search/all?query=%EC%9E%A5%EB%82%9C%EA%B0%90&pagingIndex=1";

/// Headers sent by every client, in this order
pub const TARGET_HEADERS: [(&str, &str); 3] = [
    (
        "user-agent",
        "Mozilla/5.0 (Linux; Android 13; SM-S918N Build/TP1A.220624.014; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/122.0.6261.64 Mobile Safari/537.36",
    ),
    ("upgrade-insecure-requests", "1"),
    ("accept-language", "ko-KR,ko;q=0.9"),
];

/// Per-request timeout for every client
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// GET request every probe client sends
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    url: Url,
    headers: Vec<(String, String)>,
    timeout: Duration,
}

impl ProbeRequest {
    pub fn new(url: &str, headers: &[(&str, &str)]) -> Result<Self, ProbeError> {
        let url = Url::parse(url).map_err(|e| ProbeError::InvalidUrl(format!("{}: {}", url, e)))?;
        let headers = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Ok(Self {
            url,
            headers,
            timeout: PROBE_TIMEOUT,
        })
    }

    /// The built-in target with its fixed headers
    pub fn target() -> Result<Self, ProbeError> {
        Self::new(TARGET_URL, &TARGET_HEADERS)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Host portion for log fields; query strings stay out of the log
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
