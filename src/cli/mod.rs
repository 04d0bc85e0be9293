//! cli
//!
//! Command-line interface for metax-access.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve connection settings from flags and the configuration file
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers only read and print JSON; every Metax
//! request goes through [`crate::client::MetaxApi`].
//!
//! Missing connection settings are usage errors: they are reported through
//! clap and exit with status 2, like any other bad argument.

pub mod args;
pub mod commands;

pub use args::{Cli, Command, ResourceKind, Shell};

use std::io::IsTerminal;

use anyhow::{Context as _, Result};
use clap::error::ErrorKind;
use clap::CommandFactory;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::client::{create_client, MetaxApi};
use crate::config::{Config, ConfigError, MetaxConfig};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    if let Command::Completion { shell } = cli.command {
        return commands::completion(shell);
    }

    let settings = resolve_settings(&cli)?;
    let metax = connect(&settings)?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(commands::dispatch(cli.command, metax.as_ref()))
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` selects the filter, defaulting to `warn`; `--debug` forces
/// `debug`. Logs go to stderr so that stdout stays parseable JSON.
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Already installed when running inside a test harness
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();
}

/// Combine the configuration file with the command-line flags.
///
/// Exits with a usage error if the host or the credentials are missing.
fn resolve_settings(cli: &Cli) -> Result<MetaxConfig> {
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err @ ConfigError::NotFound { .. }) => usage_error(&err.to_string()),
        Err(err) => return Err(err.into()),
    };
    if let Some(path) = config.loaded_from() {
        tracing::debug!(path = %path.display(), "using configuration file");
    }

    let mut settings = config.metax().clone().merge(cli.overrides());
    if settings.url.as_deref().map_or(true, str::is_empty) {
        usage_error("Metax hostname must be provided.");
    }
    if settings.token.is_none() {
        const MISSING: &str = "Username and password or access token must be provided.";
        let Some(user) = settings.user.clone() else {
            usage_error(MISSING);
        };
        if settings.password.is_none() {
            if !std::io::stdin().is_terminal() {
                usage_error(MISSING);
            }
            let password = rpassword::prompt_password(format!("Metax password for {}: ", user))
                .context("failed to read password")?;
            settings.password = Some(password);
        }
    }
    Ok(settings)
}

fn connect(settings: &MetaxConfig) -> Result<Box<dyn MetaxApi>> {
    create_client(settings).context("failed to create Metax client")
}

/// Print a usage error and exit with status 2.
fn usage_error(message: &str) -> ! {
    Cli::command()
        .error(ErrorKind::MissingRequiredArgument, message)
        .exit()
}
