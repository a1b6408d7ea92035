//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Formfill - Fill form schemas from document text with a language model.
#[derive(Debug, Parser)]
#[command(name = "formfill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (bare values)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract field values from a document
    Extract(ExtractArgs),

    /// List models offered by the provider
    Models(ModelsArgs),

    /// Validate a schema file and show its fields
    Schema(SchemaArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Schema file (`{"fields": [...]}`)
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Plain-text document file
    #[arg(short, long, conflicts_with = "stdin")]
    pub text: Option<PathBuf>,

    /// Read the document from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Model id (overrides the profile)
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key (overrides the profile's environment variable)
    #[arg(long, env = "FORMFILL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Write the schema with extracted values to this file
    #[arg(short, long)]
    pub output_schema: Option<PathBuf>,
}

/// Arguments for the models command.
#[derive(Debug, Parser)]
pub struct ModelsArgs {
    /// Only show models whose id or name contains this text
    #[arg(long)]
    pub filter: Option<String>,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// API key (overrides the profile's environment variable)
    #[arg(long, env = "FORMFILL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

/// Arguments for the schema command.
#[derive(Debug, Parser)]
pub struct SchemaArgs {
    /// Schema file to check
    pub file: PathBuf,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Provider API base URL
        #[arg(short, long)]
        url: Option<String>,
        /// Default model id
        #[arg(short, long)]
        model: Option<String>,
        /// Environment variable holding the API key
        #[arg(short = 'k', long)]
        api_key_env: Option<String>,
        /// Value sent as HTTP-Referer
        #[arg(long)]
        referer: Option<String>,
        /// Value sent as X-Title
        #[arg(long)]
        app_title: Option<String>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
