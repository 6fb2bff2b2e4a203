//! Single-shot probes reducing every client result to a `ProbeOutcome`.
//!
//! A probe never fails on the network side: a missing client, a transport
//! error and a completed response all come back as an outcome. The only
//! error is a failed write of the console lines to `out`.

use crate::core::probe::client::{client_for, HttpProbeClient};
use crate::core::probe::debug_logger::DebugLogger;
use crate::core::probe::request::ProbeRequest;
use crate::core::probe::types::{ClientKind, ProbeOutcome};
use std::io::{self, Write};
use std::time::Instant;

/// Probe `kind` with the production client compiled into this build
pub fn probe(
    kind: ClientKind,
    request: &ProbeRequest,
    logger: &DebugLogger,
    out: &mut dyn Write,
) -> io::Result<ProbeOutcome> {
    let client = client_for(kind);
    probe_with(kind, client.as_deref(), request, logger, out)
}

/// Probe with an explicit client; `None` means the client is not installed
pub fn probe_with(
    kind: ClientKind,
    client: Option<&dyn HttpProbeClient>,
    request: &ProbeRequest,
    logger: &DebugLogger,
    out: &mut dyn Write,
) -> io::Result<ProbeOutcome> {
    let Some(client) = client else {
        writeln!(out, "   WARN {} not installed", kind)?;
        logger.debug_sync(
            "Probe",
            "client_missing",
            &format!("{} not compiled in (feature {})", kind, kind.feature()),
        );
        return Ok(ProbeOutcome::NotInstalled);
    };
    debug_assert_eq!(client.kind(), kind, "client does not match its probe slot");

    writeln!(
        out,
        "[{}/{}] {} test...",
        kind.position(),
        ClientKind::ALL.len(),
        kind
    )?;
    logger.probe_start(
        kind.name(),
        request.host(),
        request.timeout().as_millis() as u64,
    );

    let start = Instant::now();
    let result = client.get(request);
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(response) => {
            writeln!(
                out,
                "   OK HTTP {} ({} bytes)",
                response.status, response.body_len
            )?;
            let outcome = ProbeOutcome::Status(response.status);
            logger.probe_end(
                kind.name(),
                outcome.label(),
                Some(response.status),
                duration_ms,
                Some(response.body_len),
            );
            Ok(outcome)
        }
        Err(e) => {
            writeln!(out, "   ERROR: {}", e)?;
            logger.error_sync("Probe", "probe_error", &format!("{}: {}", kind, e));
            logger.probe_end(
                kind.name(),
                ProbeOutcome::Error.label(),
                None,
                duration_ms,
                None,
            );
            Ok(ProbeOutcome::Error)
        }
    }
}
