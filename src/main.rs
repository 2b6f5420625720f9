use std::sync::Arc;

mod api;
mod config;
mod error;
mod handler;
mod http;
mod logger;
mod model;
mod prompts;
mod schema;
mod server;

use config::{AppState, Config};
use error::StartupError;
use model::GeminiProvider;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; the environment may already carry everything
    dotenvy::dotenv().ok();

    // Fails on a missing credential before anything is bound
    let cfg = Config::load()?;
    logger::init(&cfg.logging)?;

    // Create the Tokio runtime, sizing it by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        tracing::info!("Using {workers} worker threads");
    } else {
        tracing::info!("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))?;
    Ok(())
}

async fn async_main(cfg: Config) -> Result<(), StartupError> {
    let addr = cfg.socket_addr()?;
    let provider = Arc::new(GeminiProvider::new(&cfg.model)?);

    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(AppState::new(cfg, provider));
    server::run(listener, state, server::shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}
