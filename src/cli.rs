use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::profile::Variant;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a job form into a RAMS PDF.
    Render(RenderArgs),
    /// Print the normalized job record as JSON.
    Normalize(NormalizeArgs),
    /// Print a built-in document profile as YAML.
    Profile(ProfileArgs),
}

/// Which document profile to use.
#[derive(Debug, Clone, Args)]
pub struct ProfileSource {
    /// Built-in variant to start from.
    #[arg(long, value_enum, default_value_t = Variant::Standard)]
    pub variant: Variant,

    /// YAML file overriding parts of the variant's profile.
    #[arg(long)]
    pub profile: Option<String>,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Job form as YAML or JSON.
    #[arg(long)]
    pub input: String,

    /// Output path for the PDF.
    #[arg(long, default_value = crate::render::PDF_FILENAME)]
    pub out: String,

    #[command(flatten)]
    pub profile: ProfileSource,

    /// Date used when the form has no job date (default: today).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Overwrite an existing output file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Job form as YAML or JSON.
    #[arg(long)]
    pub input: String,

    #[command(flatten)]
    pub profile: ProfileSource,

    /// Date used when the form has no job date (default: today).
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub profile: ProfileSource,
}
