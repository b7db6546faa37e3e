use crate::domain::model::Platform;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "social-uploader")]
#[command(about = "Redact social media data exports and donate them to a research Drive folder")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true, default_value = super::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the supported platforms
    Platforms,
    /// List the sanitized keys found in an export
    Keys {
        file: PathBuf,
    },
    /// Redact an export and write it to a directory
    Redact(RedactArgs),
    /// Redact an export and upload it
    Upload(UploadArgs),
    /// Redact an export and bundle it with its analytics as a zip
    Export(ExportArgs),
    /// Run the web interface
    Serve(ServeArgs),
}

#[derive(Debug, Clone, Args)]
pub struct DocumentArgs {
    /// Path to the JSON or JSON-lines export
    pub file: PathBuf,

    #[arg(short, long)]
    pub platform: Platform,

    /// Additional key to redact (repeatable)
    #[arg(long = "extra-key")]
    pub extra_keys: Vec<String>,

    /// Reuse an anonymous ID from an earlier upload
    #[arg(long)]
    pub user_id: Option<String>,

    #[arg(long, help = "Confirm the export will be deleted after processing")]
    pub acknowledge_deletion: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RedactArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct UploadArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    #[arg(long, help = "File under research_donations instead of non_donations")]
    pub donate: bool,

    /// Write the folder tree under this directory instead of Drive
    #[arg(long)]
    pub local_store: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    /// Zip path, defaults to `<file name>.zip`
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[arg(long, env = "SOCIAL_UPLOADER_PORT")]
    pub port: Option<u16>,

    #[arg(long, action = clap::ArgAction::Set)]
    pub headless: Option<bool>,

    #[arg(long)]
    pub bind: Option<String>,

    #[arg(long)]
    pub local_store: Option<PathBuf>,

    #[arg(long, env = "SOCIAL_UPLOADER_JSON_LOGS", help = "Emit JSON log lines")]
    pub json_logs: bool,
}
