//! CLI command definitions

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// CLI arguments for tutor-relay
#[derive(Parser, Debug)]
#[command(name = "tutor-relay")]
#[command(author, version, about = "Streaming AI tutor chat relay over server-sent events")]
#[command(long_about = r#"
tutor-relay serves a tutoring chat endpoint backed by an Azure OpenAI
deployment. Each POST /aitutor/chat turn streams the answer as server-sent
events and ends with a final event carrying suggested follow-up questions.

Configuration files are loaded from (in priority order):
1. TUTOR_RELAY_* and AZURE_OPENAI_* environment variables (.env is read first)
2. --config <path>     Explicit config file
3. ./tutor-relay.toml  Project-level config
4. ~/.config/tutor-relay/config.toml   Global config

Example:
  tutor-relay --bind 127.0.0.1:8000 -v
  tutor-relay --config ./deploy/tutor-relay.toml --log-dir ./logs
"#)]
pub struct Cli {
    /// Listen address (overrides server.bind)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files (environment still applies)
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Default log filter for the verbosity count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
