/*!
HTTP client implementations driven by the probes.

Each client sends the same GET through a different stack, so the endpoint sees
a different TLS and HTTP fingerprint per client while the request line and
headers stay identical.

## Clients

- **ureq**: rustls, HTTP/1.1, follows redirects
- **isahc**: libcurl via isahc, HTTP/2 over ALPN when offered, no redirects
- **curl**: libcurl easy handle, follows redirects

Each client lives behind its own cargo feature. A build without the feature
reports the client as not installed.
*/

use crate::core::probe::request::ProbeRequest;
use crate::core::probe::types::{ClientKind, ProbeError, ProbeResponse};
#[cfg(any(feature = "client-ureq", feature = "client-isahc"))]
use std::io;

#[cfg(feature = "client-isahc")]
use isahc::config::Configurable;
#[cfg(feature = "client-isahc")]
use isahc::{HttpClient, ReadResponseExt, Request};

/// HTTP client abstraction for dependency injection and testing
pub trait HttpProbeClient: Send + Sync {
    /// Which client this is
    fn kind(&self) -> ClientKind;

    /// Execute exactly one GET for `request`
    ///
    /// Any completed response is `Ok`, whatever its status.
    fn get(&self, request: &ProbeRequest) -> Result<ProbeResponse, ProbeError>;
}

/// Production client for `kind`, or None when this build lacks it
pub fn client_for(kind: ClientKind) -> Option<Box<dyn HttpProbeClient>> {
    match kind {
        ClientKind::Ureq => ureq_client(),
        ClientKind::Isahc => isahc_client(),
        ClientKind::Curl => curl_client(),
    }
}

#[cfg(feature = "client-ureq")]
fn ureq_client() -> Option<Box<dyn HttpProbeClient>> {
    Some(Box::new(UreqProbeClient))
}

#[cfg(not(feature = "client-ureq"))]
fn ureq_client() -> Option<Box<dyn HttpProbeClient>> {
    None
}

#[cfg(feature = "client-isahc")]
fn isahc_client() -> Option<Box<dyn HttpProbeClient>> {
    Some(Box::new(IsahcProbeClient))
}

#[cfg(not(feature = "client-isahc"))]
fn isahc_client() -> Option<Box<dyn HttpProbeClient>> {
    None
}

#[cfg(feature = "client-curl")]
fn curl_client() -> Option<Box<dyn HttpProbeClient>> {
    Some(Box::new(CurlProbeClient))
}

#[cfg(not(feature = "client-curl"))]
fn curl_client() -> Option<Box<dyn HttpProbeClient>> {
    None
}

/// Probe client using a fresh ureq agent per request
#[cfg(feature = "client-ureq")]
#[derive(Debug, Default)]
pub struct UreqProbeClient;

#[cfg(feature = "client-ureq")]
impl HttpProbeClient for UreqProbeClient {
    fn kind(&self) -> ClientKind {
        ClientKind::Ureq
    }

    fn get(&self, request: &ProbeRequest) -> Result<ProbeResponse, ProbeError> {
        // 4xx/5xx must come back as a status, not an error
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(request.timeout()))
            .http_status_as_error(false)
            .build()
            .into();

        let mut builder = agent.get(request.url());
        for (key, value) in request.headers() {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let mut response = builder
            .call()
            .map_err(|e| ProbeError::Transport(e.to_string()))?;
        let status = response.status().as_u16();

        // Count without buffering and without ureq's 10 MiB cap
        let mut reader = response.body_mut().with_config().limit(u64::MAX).reader();
        let body_len = io::copy(&mut reader, &mut io::sink())
            .map_err(|e| ProbeError::Body(e.to_string()))?;

        Ok(ProbeResponse { status, body_len })
    }
}

/// Probe client using isahc's blocking API
#[cfg(feature = "client-isahc")]
#[derive(Debug, Default)]
pub struct IsahcProbeClient;

#[cfg(feature = "client-isahc")]
impl HttpProbeClient for IsahcProbeClient {
    fn kind(&self) -> ClientKind {
        ClientKind::Isahc
    }

    fn get(&self, request: &ProbeRequest) -> Result<ProbeResponse, ProbeError> {
        let client = HttpClient::new()
            .map_err(|e| ProbeError::Request(format!("failed to create HTTP client: {}", e)))?;

        let mut builder = Request::get(request.url()).timeout(request.timeout());
        for (key, value) in request.headers() {
            builder = builder.header(key.as_str(), value.as_str());
        }
        let http_request = builder
            .body(())
            .map_err(|e| ProbeError::Request(e.to_string()))?;

        let mut response = client
            .send(http_request)
            .map_err(|e| ProbeError::Transport(e.to_string()))?;
        let status = response.status().as_u16();

        let body_len = response
            .copy_to(io::sink())
            .map_err(|e| ProbeError::Body(e.to_string()))?;

        Ok(ProbeResponse { status, body_len })
    }
}

/// Probe client driving a libcurl easy handle directly
#[cfg(feature = "client-curl")]
#[derive(Debug, Default)]
pub struct CurlProbeClient;

#[cfg(feature = "client-curl")]
impl CurlProbeClient {
    fn perform(request: &ProbeRequest, body_len: &mut u64) -> Result<u32, curl::Error> {
        let mut easy = curl::easy::Easy::new();
        easy.url(request.url())?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.timeout(request.timeout())?;

        let mut list = curl::easy::List::new();
        for (key, value) in request.headers() {
            list.append(&format!("{}: {}", key.trim(), value.trim()))?;
        }
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                *body_len += data.len() as u64;
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        easy.response_code()
    }
}

#[cfg(feature = "client-curl")]
impl HttpProbeClient for CurlProbeClient {
    fn kind(&self) -> ClientKind {
        ClientKind::Curl
    }

    fn get(&self, request: &ProbeRequest) -> Result<ProbeResponse, ProbeError> {
        let mut body_len = 0u64;
        let code = Self::perform(request, &mut body_len).map_err(|e| {
            if e.is_write_error() {
                ProbeError::Body(e.to_string())
            } else {
                ProbeError::Transport(e.to_string())
            }
        })?;
        let status = u16::try_from(code).map_err(|_| ProbeError::InvalidStatus(code))?;

        Ok(ProbeResponse { status, body_len })
    }
}
