use clientprobe::cli::Cli;
use clientprobe::core::probe::{get_debug_logger, run_all, ProbeRequest};
use std::io::{self, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _cli = Cli::parse_args();

    let logger = get_debug_logger();
    let request = ProbeRequest::target()?;
    logger.debug_sync(
        "Main",
        "start",
        &format!("Probing {} with session {}", request.host(), logger.get_session_id()),
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_all(&request, &logger, &mut out)?;
    out.flush()?;

    Ok(())
}
