use std::sync::LazyLock;
use clap::{Args, Parser, Subcommand};

fn long_version() -> &'static str {
    static VERSION: LazyLock<String> = LazyLock::new(|| match option_env!("GIT_HASH") {
        Some(hash) => format!("{} ({})", env!("CARGO_PKG_VERSION"), hash),
        None => env!("CARGO_PKG_VERSION").to_string(),
    });
    &VERSION
}

#[derive(Parser)]
#[command(
    name = "veriom",
    version,
    long_version = long_version(),
    about = "External attacker-perspective verifier for cloud misconfiguration findings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify a findings export from the outside
    Verify(VerifyArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct VerifyArgs {
    /// Input CSV of findings
    #[arg(short, long)]
    pub input: String,

    /// Output CSV with verdict columns appended
    #[arg(short, long)]
    pub output: String,

    /// Concurrent probe slots (default 5)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// HTTP probe timeout in seconds (default 5)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// TCP connect timeout in seconds (default 3)
    #[arg(long)]
    pub connect_timeout_secs: Option<u64>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}
