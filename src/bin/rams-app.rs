use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use rams::app::server::{AppState, router};
use rams::profile::{DocumentProfile, Variant};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct AppArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Built-in variant served by this instance.
    #[arg(long, value_enum, default_value_t = Variant::Standard)]
    variant: Variant,

    /// YAML file overriding parts of the variant's profile.
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Reject submissions with a blank company, job title or location.
    #[arg(long)]
    require_core_fields: bool,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    rams::logging::init()?;

    let args = AppArgs::parse();
    tracing::info!(?args, "starting rams-app");

    let base = DocumentProfile::for_variant(args.variant);
    let mut profile = match &args.profile {
        Some(path) => DocumentProfile::load(path, &base)?,
        None => base,
    };
    profile.apply_env();
    profile.require_core_fields |= args.require_core_fields;
    tracing::info!(
        variant = profile.variant.as_str(),
        gated = profile.payment_gate.is_some(),
        require_core_fields = profile.require_core_fields,
        "loaded document profile"
    );

    let app = router(AppState::new(profile));

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app).await.context("serve")?;
    Ok(())
}
