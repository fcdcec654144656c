use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "suture",
    version,
    about = "Score suture placement in photographs of sutured skin models"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Calibrate, measure and score one image
    Evaluate(EvaluateArgs),
    /// Re-score a stored provider response (or a report's raw_ai_result)
    Score(ScoreArgs),
    Version,
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum ProviderKind {
    /// Live OpenAI-compatible vision endpoint
    #[default]
    Openai,
    /// Canned response (demo payload or --fake-response)
    Fake,
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args, Clone, Debug)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the JSON report to this file as well
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args, Clone, Debug)]
pub struct EvaluateArgs {
    /// Image of the sutured wound
    pub image: PathBuf,

    #[arg(long, value_enum, default_value_t = ProviderKind::Openai, env = "SUTURE_PROVIDER")]
    pub provider: ProviderKind,

    /// Response text served by the fake provider (default: built-in demo)
    #[arg(long)]
    pub fake_response: Option<PathBuf>,

    /// Provider config file (YAML); environment variables still apply
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the provider model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Override the provider base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Use this pixels-per-mm ratio instead of estimating one
    #[arg(long)]
    pub scale: Option<f64>,

    /// Give up on the provider after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(clap::Args, Clone, Debug)]
pub struct ScoreArgs {
    /// JSON file holding {"sutures": [...]} or a full report
    pub raw: PathBuf,

    /// Pixels-per-mm ratio to score with
    #[arg(long)]
    pub scale: f64,

    /// Image identifier for the report (default: the stored one or the file name)
    #[arg(long)]
    pub image_id: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}
