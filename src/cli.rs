use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "identitrace",
    about = "Identifier enrichment API (IP, phone, username)",
    long_about = "identitrace exposes lookup endpoints that enrich a single identifier -\nan IP address, a phone number, or a username - by querying external data\nsources and normalizing their responses into a stable JSON shape."
)]
pub struct Args {
    /// Address to bind the server to
    #[arg(short = 'b', long = "bind", value_name = "ADDR")]
    pub bind_addr: Option<String>,

    /// Port to listen on
    #[arg(short = 'p', long = "port", value_name = "PORT")]
    pub port: Option<u16>,

    /// Max requests per client within the rate-limit window
    #[arg(long = "max-requests", value_name = "N")]
    pub max_requests: Option<u32>,

    /// Rate-limit window in seconds
    #[arg(long = "window", value_name = "SECS")]
    pub window_secs: Option<u64>,

    /// Per-probe timeout in seconds for username checks
    #[arg(long = "probe-timeout", value_name = "SECS")]
    pub probe_timeout_secs: Option<u64>,

    /// Silent mode (no banner)
    #[arg(long = "silent")]
    pub silent: bool,

    /// Verbose mode
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
}
