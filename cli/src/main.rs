#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::{process::ExitCode, sync::Arc};

use crate::app_config::AppConfig;
use args::{CliArgs, Command};
use clap::Parser;
use commands::{
    browse::browse_cmd, completions::completions_cmd, config::config_cmd, init::init_cmd,
    note::note_cmd, profile::profile_cmd,
};
use profile::{get_profile_path, Profile};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ui::Toaster;
use web_client::NotesClient;

mod app_config;
mod args;
mod commands;
mod editor;
mod init;
mod profile;
mod query;
mod screens;
mod ui;
mod web_client;

#[cfg(test)]
mod test;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    setup_tracing(args.config.verbose);

    let Some(command) = args.command else {
        return Ok(ExitCode::SUCCESS);
    };

    let profile_path = get_profile_path(&args.config.profile_path);
    let profile = Profile::from_path(&profile_path)?;
    let config = AppConfig::from_args(&args.config, &profile_path, profile.as_ref());
    debug!("Using profile {}", config.profile_path);

    match command {
        Command::Config => config_cmd(config)?,
        Command::Init => init_cmd(&config, &profile_path)?,
        Command::Profile { command } => profile_cmd(command)?,
        Command::Completions { shell } => completions_cmd(shell),
        Command::Note(subcommand) => {
            let api = Arc::new(NotesClient::new(&config.api_url, config.token.clone())?);
            return note_cmd(api, Toaster, config.notes_settings(), subcommand).await;
        }
        Command::Browse(browse_args) => {
            let api = Arc::new(NotesClient::new(&config.api_url, config.token.clone())?);
            return browse_cmd(api, Toaster, config.notes_settings(), browse_args).await;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn setup_tracing(verbose: bool) {
    let default_filter = if verbose { "notehub=debug" } else { "notehub=warn" };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
