use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

mod api;
mod config;
mod logger;
mod routing;
mod server;
mod store;

use store::{MemoryPuppyStore, SharedStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Build the Tokio runtime with the configured worker count
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let store = build_store(&cfg)?;
    let state = Arc::new(config::AppState::new(cfg, store));
    let active_connections = Arc::new(AtomicUsize::new(0));

    let signals = Arc::new(server::signal::SignalHandler::new());
    server::signal::start_signal_handler(Arc::clone(&signals));

    logger::log_server_start(&addr, &state.config);

    // LocalSet so connection tasks can use spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(
            listener,
            state,
            active_connections,
            signals,
        ))
        .await;

    Ok(())
}

/// Build the record store, seeded from the configured file if any.
fn build_store(cfg: &config::Config) -> Result<SharedStore, Box<dyn std::error::Error>> {
    let store: SharedStore = match &cfg.store.seed_file {
        Some(path) => Arc::new(MemoryPuppyStore::from_seed_file(path)?),
        None => Arc::new(MemoryPuppyStore::new()),
    };
    Ok(store)
}
