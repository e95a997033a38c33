//! SnapPaste CLI entry point

use std::process::ExitCode;

use clap::Parser;

use snappaste::cli::{
    handle_config_command, handle_interfaces_command, handle_paste_command, load_merged_config,
    run_server, Cli, Commands, Presenter, EXIT_ERROR, EXIT_USAGE_ERROR,
};
use snappaste::domain::error::ConfigError;
use snappaste::infrastructure::XdgConfigStore;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let presenter = Presenter::new();
    let cli_config = cli.to_config();

    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            match handle_config_command(action, &store, &presenter).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e @ ConfigError::ValidationError { .. }) => {
                    presenter.error(&e.to_string());
                    ExitCode::from(EXIT_USAGE_ERROR)
                }
                Err(e) => {
                    presenter.error(&e.to_string());
                    ExitCode::from(EXIT_ERROR)
                }
            }
        }
        Some(Commands::Interfaces { json }) => {
            let config = load_merged_config(cli_config).await;
            match handle_interfaces_command(&config, json, &presenter).await {
                Ok(_) => ExitCode::SUCCESS,
                Err(e) => {
                    presenter.error(&e.to_string());
                    ExitCode::from(EXIT_ERROR)
                }
            }
        }
        Some(Commands::Paste { file }) => {
            let config = load_merged_config(cli_config).await;
            match handle_paste_command(&config, &file, &presenter).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    presenter.error(&e.to_string());
                    ExitCode::from(EXIT_ERROR)
                }
            }
        }
        None => {
            let config = load_merged_config(cli_config).await;
            run_server(config).await
        }
    }
}

/// `RUST_LOG` wins; otherwise info, or debug with `-v`
fn init_logging(verbose: bool) {
    let default = if verbose { "snappaste=debug" } else { "snappaste=info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_secs()
        .init();
}
