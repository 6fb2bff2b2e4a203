use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "clientprobe")]
#[command(version = concat!("Ver:", env!("CARGO_PKG_VERSION")))]
#[command(about = "Send one GET through ureq, isahc and curl and compare how the endpoint answers")]
pub struct Cli {}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
