//! Runs every probe in order and prints the comparison.

use crate::core::probe::client::{client_for, HttpProbeClient};
use crate::core::probe::debug_logger::DebugLogger;
use crate::core::probe::request::ProbeRequest;
use crate::core::probe::runner::probe_with;
use crate::core::probe::types::{ClientKind, ProbeOutcome};
use std::io::{self, Write};
use std::time::{Duration, Instant};

const RULE_WIDTH: usize = 60;
const NAME_WIDTH: usize = 15;

/// Outcome of one full comparison run
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSummary {
    /// One entry per client, in probe order
    pub results: Vec<(ClientKind, ProbeOutcome)>,
    /// Wall-clock time across all probes
    pub duration: Duration,
}

impl ProbeSummary {
    /// Number of clients that got exactly HTTP 200
    pub fn success_count(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, outcome)| outcome.is_success())
            .count()
    }

    pub fn successful_clients(&self) -> Vec<ClientKind> {
        self.results
            .iter()
            .filter(|(_, outcome)| outcome.is_success())
            .map(|(kind, _)| *kind)
            .collect()
    }

    pub fn outcome(&self, kind: ClientKind) -> Option<ProbeOutcome> {
        self.results
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, outcome)| *outcome)
    }

    /// Results table, totals and verdict
    pub fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(out, "\n=== Test Results ===\n")?;

        for (kind, outcome) in &self.results {
            writeln!(
                out,
                "  {:<width$}: {}",
                kind.name(),
                outcome.status_text(),
                width = NAME_WIDTH
            )?;
        }

        writeln!(out, "\nDuration: {:.2}s", self.duration.as_secs_f64())?;

        let success_count = self.success_count();
        writeln!(
            out,
            "Success (HTTP 200): {}/{}",
            success_count,
            self.results.len()
        )?;

        if success_count > 0 {
            writeln!(out, "\n=== SUCCESS: HTTP client bypassed bot detection! ===")?;
            writeln!(out, "\nSuccessful clients:")?;
            for kind in self.successful_clients() {
                writeln!(out, "  - {}", kind)?;
            }
        } else {
            writeln!(out, "\n=== FAILED: All HTTP clients detected as bots ===")?;
            writeln!(out, "\nConclusion:")?;
            writeln!(
                out,
                "  - Every client stack is rejected (TLS fingerprinting applies regardless of client)"
            )?;
            writeln!(
                out,
                "  - Server-side HTTP requests are blocked regardless of implementation"
            )?;
        }

        writeln!(out, "\nTest complete.")?;
        Ok(())
    }
}

fn print_banner(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "\n=== HTTP Clients Test ===\n")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "\nclientprobe version: {}", env!("CARGO_PKG_VERSION"))?;

    let compiled: Vec<&str> = ClientKind::ALL
        .iter()
        .filter(|kind| kind.is_available())
        .map(|kind| kind.name())
        .collect();
    if compiled.is_empty() {
        writeln!(out, "Compiled-in clients: none")?;
    } else {
        writeln!(out, "Compiled-in clients: {}", compiled.join(", "))?;
    }

    writeln!(out, "\nTesting {} clients:\n", ClientKind::ALL.len())?;
    Ok(())
}

/// Run the comparison with the clients compiled into this build
pub fn run_all(
    request: &ProbeRequest,
    logger: &DebugLogger,
    out: &mut dyn Write,
) -> io::Result<ProbeSummary> {
    run_all_with(request, logger, out, client_for)
}

/// Run the comparison resolving each client through `clients`
pub fn run_all_with<F>(
    request: &ProbeRequest,
    logger: &DebugLogger,
    out: &mut dyn Write,
    clients: F,
) -> io::Result<ProbeSummary>
where
    F: Fn(ClientKind) -> Option<Box<dyn HttpProbeClient>>,
{
    print_banner(out)?;

    let start = Instant::now();
    let mut results = Vec::with_capacity(ClientKind::ALL.len());
    for kind in ClientKind::ALL {
        let client = clients(kind);
        let outcome = probe_with(kind, client.as_deref(), request, logger, out)?;
        results.push((kind, outcome));
    }
    let duration = start.elapsed();

    let summary = ProbeSummary { results, duration };
    logger.summary(
        summary.success_count(),
        summary.results.len(),
        duration.as_millis() as u64,
    );
    logger.performance_sync("Report", "run_all", duration.as_millis() as u64);

    summary.render(out)?;
    Ok(summary)
}
