//! Entry point. Configuration is environment-only (`spec.md` §6); there is
//! no CLI argument parsing.

use leo_core::{RunConfig, RunContext};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match RunConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            std::process::exit(1);
        }
    };

    let rng_seed = std::env::var("RNG_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(42);
    let ctx = RunContext::new(config, rng_seed);

    match leo_pipeline::run(&ctx).await {
        Ok(outcome) => {
            tracing::info!(
                artifact = %outcome.artifact_path.display(),
                snapshot = %outcome.snapshot_path.display(),
                "pipeline run succeeded"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, exit_code = e.exit_code(), "pipeline run failed");
            std::process::exit(e.exit_code());
        }
    }
}
