use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    rams::logging::init().context("init logging")?;

    let cli = rams::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        rams::cli::Command::Render(args) => {
            rams::render::run(args).context("render")?;
        }
        rams::cli::Command::Normalize(args) => {
            rams::render::run_normalize(args).context("normalize")?;
        }
        rams::cli::Command::Profile(args) => {
            rams::render::run_profile(args).context("profile")?;
        }
    }

    Ok(())
}
