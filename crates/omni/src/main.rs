use std::sync::Arc;

use omni_core::{config::Config, features::build_router, render::RenderApi};
use omni_seedance::SeedanceClient;

#[tokio::main]
async fn main() -> Result<(), omni_core::Error> {
    omni_core::logging::init("omni")?;

    let cfg = Arc::new(Config::load()?);
    tracing::info!(mode = ?cfg.mode, "configuration loaded");

    let render: Arc<dyn RenderApi> = Arc::new(SeedanceClient::from_config(&cfg)?);
    let router = Arc::new(build_router(render)?);

    omni_telegram::router::run_polling(cfg, router)
        .await
        .map_err(|e| omni_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
