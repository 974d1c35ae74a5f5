use anyhow::Result;
use clap::Parser;

use glassbox_core::config::GlassboxConfig;

use glassbox_daemon::cli::DaemonCli;
use glassbox_daemon::logging;
use glassbox_daemon::orchestrator::Orchestrator;

#[tokio::main]
async fn main() -> Result<()> {
    let args = DaemonCli::parse();

    let mut config = GlassboxConfig::load(&args.config)
        .await
        .map_err(|e| anyhow::anyhow!("failed to load {}: {}", args.config.display(), e))?;
    args.apply_overrides(&mut config);

    if args.validate {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("configuration invalid: {}", e))?;
        println!("configuration OK: {}", args.config.display());
        return Ok(());
    }

    logging::init_tracing(&config.general)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        "glassbox-daemon starting"
    );

    let mut orchestrator = Orchestrator::build_from_config(config).await?;
    orchestrator.run().await?;

    tracing::info!("glassbox-daemon shut down");
    Ok(())
}
