mod api;
mod cli;
mod config;
mod ddns;
mod error;

use std::process::ExitCode;

use api::Route53Client;
use clap::{CommandFactory, Parser};
use cli::Cli;
use config::Settings;
use ddns::Route53Ddns;
use error::{DdnsError, Result};
use log::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Initialize logging
    let filter = if cli.verbose {
        "warn,route53_ddns=info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            if matches!(e, DdnsError::InvalidArguments(_)) {
                eprintln!("{}", Cli::command().render_usage());
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    cli.check_arity()?;
    let config = config::load_config(cli.config.as_deref())?;
    let settings = Settings::resolve(cli.overrides(), config)?;

    let client = Route53Client::new(
        &settings.credentials.access_key_id,
        &settings.credentials.secret_access_key,
        &settings.endpoint,
        settings.timeout,
    )?;

    let ddns = Route53Ddns::new(client, cli.dry_run);
    ddns.run(&cli.request(settings.ttl)).await?;
    Ok(())
}
