//! Command-line arguments for the `onboard` binary.

use clap::{ArgAction, Parser, ValueEnum};
use onboard_core::client::DASHBOARD_DEFAULT_BASE_URL;
use onboard_core::config::OnboardPolicy;

/// Claim devices into a dashboard organization, create their network and bind
/// it to a configuration template.
///
/// Informational output lines start with `@ `.
#[derive(Parser)]
#[command(name = "onboard", version, about)]
pub struct Cli {
    /// Dashboard API key
    #[arg(short = 'k', long = "api-key", env = "DASHBOARD_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Organization name
    #[arg(short = 'o', long = "org")]
    pub organization: String,

    /// Space-separated serial numbers or license keys
    #[arg(short = 's', long = "serials")]
    pub serials: String,

    /// Network name
    #[arg(short = 'n', long = "network")]
    pub network: String,

    /// Configuration template name
    #[arg(short = 'c', long = "template")]
    pub template: String,

    /// Tags for a newly created network
    #[arg(short = 't', long = "tags")]
    pub tags: Option<String>,

    /// Street address written to every device
    #[arg(short = 'a', long = "address")]
    pub address: Option<String>,

    /// Tolerance mode
    #[arg(short = 'm', long = "mode", value_enum)]
    pub mode: Option<Mode>,

    /// Dashboard API base URL
    #[arg(long, env = "DASHBOARD_API_URL", default_value = DASHBOARD_DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Value of `-m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Reuse an existing network and finish even if binding fails
    #[value(name = "ignore_error")]
    IgnoreError,
}

impl Cli {
    /// Tolerance policy selected by `-m`.
    pub fn policy(&self) -> OnboardPolicy {
        match self.mode {
            Some(Mode::IgnoreError) => OnboardPolicy::ignore_error(),
            None => OnboardPolicy::strict(),
        }
    }
}
