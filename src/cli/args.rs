//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--config` / `-c <path>`: Configuration file
//! - `--host <url>`: Metax URL
//! - `--user` / `-u`, `--password` / `-p`: HTTP Basic credentials
//! - `--token`: Bearer token, instead of user and password
//! - `--api-version <v2|v3>`: Metax API version
//! - `--insecure`: Skip TLS certificate verification
//! - `--debug`: Enable debug logging
//!
//! Flags override the values of the configuration file.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::MetaxConfig;

/// Manage metadata in Metax.
#[derive(Parser, Debug)]
#[command(name = "metax_access")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Metax hostname, e.g. https://metax.fairdata.fi
    #[arg(long, global = true, value_name = "URL")]
    pub host: Option<String>,

    /// Metax username
    #[arg(short = 'u', long, global = true)]
    pub user: Option<String>,

    /// Metax password
    #[arg(short = 'p', long, global = true)]
    pub password: Option<String>,

    /// Metax access token
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Metax API version
    #[arg(long, global = true, value_name = "VERSION", value_parser = ["v2", "v3"])]
    pub api_version: Option<String>,

    /// Do not verify TLS certificates
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Connection settings given as flags, to be laid over the
    /// configuration file.
    pub fn overrides(&self) -> MetaxConfig {
        MetaxConfig {
            url: self.host.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            token: self.token.clone(),
            api_version: self.api_version.clone(),
            verify: !self.insecure,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Post file, dataset or contract metadata
    #[command(after_help = "\
EXAMPLES:
    # Post a single file, or a JSON list of files at once
    metax_access post file file.json

    # Post a contract
    metax_access post contract contract.json")]
    Post {
        /// Resource type
        #[arg(value_enum)]
        resource: ResourceKind,

        /// Path to metadata file
        filepath: PathBuf,
    },

    /// Print file, dataset or contract metadata
    Get {
        /// Resource type
        #[arg(value_enum)]
        resource: ResourceKind,

        /// Resource identifier
        identifier: String,

        /// Write the metadata to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Delete file, dataset or contract metadata
    Delete {
        /// Resource type
        #[arg(value_enum)]
        resource: ResourceKind,

        /// Resource identifier
        identifier: String,
    },

    /// Patch file, dataset or contract metadata
    Patch {
        /// Resource type
        #[arg(value_enum)]
        resource: ResourceKind,

        /// Resource identifier
        identifier: String,

        /// Path to metadata patch file
        filepath: PathBuf,
    },

    /// Print the DataCite XML of a dataset
    Datacite {
        /// Dataset identifier
        dataset: String,

        /// Use a dummy DOI if the dataset has none yet
        #[arg(long)]
        dummy_doi: bool,
    },

    /// Generate shell completion scripts
    #[command(after_help = "\
INSTALLATION:
    # Bash
    metax_access completion bash > ~/.local/share/bash-completion/completions/metax_access

    # Zsh
    metax_access completion zsh > ~/.zfunc/_metax_access

    # Fish
    metax_access completion fish > ~/.config/fish/completions/metax_access.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Resource a command operates on.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    File,
    Dataset,
    Contract,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::File => write!(f, "file"),
            ResourceKind::Dataset => write!(f, "dataset"),
            ResourceKind::Contract => write!(f, "contract"),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
