//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Course marketplace registration, from the terminal.
#[derive(Parser, Debug)]
#[command(name = "enroll", version, about, long_about = None)]
pub struct Cli {
    /// Write logs to this file instead of the terminal.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill in the registration form and submit it.
    Register(RegisterArgs),

    /// Validate a single registration field.
    Check(CheckArgs),

    /// Show the strength of a password.
    Strength(StrengthArgs),
}

#[derive(Args, Debug, Default)]
pub struct RegisterArgs {
    #[arg(long, default_value = "")]
    pub username: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub password: String,

    #[arg(long, default_value = "")]
    pub confirm_password: String,

    #[arg(long, default_value = "")]
    pub nickname: String,

    #[arg(long, default_value = "")]
    pub captcha: String,

    /// Accept the user agreement.
    #[arg(long)]
    pub agree: bool,

    /// Simulated round-trip time of the registration service.
    #[arg(long, default_value_t = 3000)]
    pub latency_ms: u64,

    /// Probability that the registration service rejects the request.
    #[arg(long, default_value_t = 0.2)]
    pub failure_rate: f64,

    /// JSON file that keeps the last successful registration. Defaults to
    /// `registrations.json` in the platform data directory.
    #[arg(long)]
    pub store: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Field name, e.g. `username` or `confirm-password`.
    pub field: String,

    /// Value to validate. Use `on` for a ticked checkbox.
    #[arg(default_value = "")]
    pub value: String,

    /// Password to compare against when checking `confirm-password`.
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct StrengthArgs {
    pub password: String,
}
