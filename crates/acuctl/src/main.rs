mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Tracing goes to stderr so stdout stays parseable. `RUST_LOG` wins over
/// `-v` when set.
fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(mut cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Config(args) => {
            config::apply_display_defaults(&mut cli.global)?;
            commands::config_cmd::handle(args, &cli.global)
        }

        Command::Completions(args) => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(args.shell, &mut cmd, "acuctl", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            config::apply_display_defaults(&mut cli.global)?;
            let console_config = config::build_console_config(&cli.global)?;
            tracing::debug!(command = ?cmd, api = %console_config.api_base, "dispatching command");
            commands::dispatch(cmd, console_config, &cli.global).await
        }
    }
}
