use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};
use crate::{delivery::DEFAULT_SHOWDOC_ENDPOINT, generator::orchestrator::DEFAULT_EXCLUDED_NAMESPACE};

#[derive(Parser, Debug)]
#[command(name = "proto-docgen")]
#[command(author, version, about = "Protobuf service documentation generator", styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from a schema document
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate one documentation page per RPC method
  Generate(GenerateCommand),
}

#[derive(Args, Debug)]
pub struct GenerateCommand {
  /// Path to the JSON schema document
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Directory where pages are written, one sub-directory per service
  #[arg(short, long, value_name = "DIR", default_value = "docs/md")]
  pub output: PathBuf,

  /// Skip services whose fully-qualified name contains this text (empty disables the filter)
  #[arg(long, value_name = "NAMESPACE", default_value = DEFAULT_EXCLUDED_NAMESPACE)]
  pub exclude_namespace: String,

  /// Do not write pages to the output directory
  #[arg(long, default_value_t = false)]
  pub no_write: bool,

  /// Documentation host endpoint used for uploads
  #[arg(long, value_name = "URL", env = "PROTO_DOCGEN_UPLOAD_URL", default_value = DEFAULT_SHOWDOC_ENDPOINT)]
  pub upload_url: String,

  /// API key of the documentation host; uploads are enabled when key and token are set
  #[arg(long, value_name = "KEY", env = "PROTO_DOCGEN_API_KEY", hide_env_values = true)]
  pub api_key: Option<String>,

  /// API token of the documentation host
  #[arg(long, value_name = "TOKEN", env = "PROTO_DOCGEN_API_TOKEN", hide_env_values = true)]
  pub api_token: Option<String>,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List every documented RPC method with its request and response types
  Methods {
    /// Path to the JSON schema document
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Skip services whose fully-qualified name contains this text
    #[arg(long, value_name = "NAMESPACE", default_value = DEFAULT_EXCLUDED_NAMESPACE)]
    exclude_namespace: String,
  },
}
