mod cli;

use clap::Parser;
use onboard::classify::parse_serials;
use onboard::{OnboardRequest, Onboarding};
use onboard_core::config::OnboardConfig;
use onboard_core::Error;
use onboard_dashboard::DashboardClientBuilder;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;
use validator::Validate;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => println!("@ End of script."),
        Err(err) => {
            tracing::debug!(code = err.error_code(), "run failed");
            println!("@ ERROR: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), Error> {
    let config = build_config(&cli)?;

    let client = DashboardClientBuilder::new(&config.api_base_url)?
        .with_http_config(config.client_config())
        .with_api_key(SecretString::from(cli.api_key))
        .build()?;

    let mut request = OnboardRequest::new(
        cli.organization,
        parse_serials(&cli.serials),
        cli.network,
        cli.template,
    );
    if let Some(tags) = cli.tags {
        request = request.with_tags(tags);
    }
    if let Some(address) = cli.address {
        request = request.with_address(address);
    }

    let report = Onboarding::new(&client, &config)
        .with_notifier(|line| println!("@ {line}"))
        .run(&request)
        .await?;

    tracing::info!(
        network_type = %report.network_type,
        enrolled = report.enrolled.len(),
        bound = report.bind.is_bound(),
        "onboarding finished"
    );
    Ok(())
}

/// Run configuration from CLI flags and their environment fallbacks.
fn build_config(cli: &Cli) -> Result<OnboardConfig, Error> {
    let mut config = OnboardConfig::new(cli.base_url.as_str())?.with_policy(cli.policy());
    if let Some(seconds) = cli.timeout {
        config = config.with_timeout(seconds);
        config.validate()?;
    }
    Ok(config)
}
