mod args;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "ytd=info,ytd_core=info",
        1 => "ytd=debug,ytd_core=debug",
        _ => "ytd=trace,ytd_core=trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Some(Commands::Playlist { url, output }) => {
            commands::playlist::run(&url, output.as_deref(), cli.config.as_deref()).await
        }
        Some(Commands::Doctor) => commands::doctor::run(cli.config.as_deref()).await,
        Some(Commands::Config) => commands::config::run(cli.config.as_deref()).await,
        None => {
            if let Some(url) = cli.url {
                let options = commands::download::DownloadOptions {
                    audio: cli.audio,
                    change_frequency: cli.change_frequency,
                    bass_boost: cli.bass_boost,
                };
                commands::download::run(&url, &options, cli.config.as_deref()).await
            } else {
                // No URL, print help
                use clap::CommandFactory;
                Cli::command().print_help()?;
                println!();
                Ok(())
            }
        }
    }
}
