use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::error;
use volume_compare::{
    cli::{Cli, startup_failure},
    config::Settings,
    controller::obtain_comparison,
    logging::init_tracing,
    presentation::{PresentationOptions, render, render_timezone},
    providers::build_provider,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            error!(error = ?err, "startup failed");
            println!("{}", render(&startup_failure(&err), &PresentationOptions::default()));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let settings = Settings::load(cli.config.as_deref()).context("failed to load configuration")?;
    if cli.show_tz {
        println!("{}", render_timezone(settings.timezone));
        return Ok(ExitCode::SUCCESS);
    }

    let provider = build_provider(&settings).context("failed to set up the market data provider")?;
    let request = cli.request(&settings);
    let now = Utc::now().with_timezone(&settings.timezone);

    let outcome = obtain_comparison(provider.as_ref(), &request, now);
    let options = PresentationOptions {
        thousands_separator: settings.thousands_separator,
    };
    println!("{}", render(&outcome, &options));

    Ok(if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
