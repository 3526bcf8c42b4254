use std::process::ExitCode;
use std::sync::Arc;

mod api;
mod config;
mod error;
mod http;
mod logger;
mod model;
mod routing;
mod server;
mod store;

use error::{Result, ServerError};
use store::{ClientStore, InMemoryClientStore};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Optional first argument: config file path, extension optional
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;

    logger::init(&cfg.logging).map_err(ServerError::Logging)?;

    // Create Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build().map_err(ServerError::Runtime)?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<()> {
    let addr = cfg.socket_addr()?;
    let listener =
        server::create_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;

    // The store is wired in here and handed to the state explicitly
    let store: Arc<dyn ClientStore> = Arc::new(InMemoryClientStore::new());
    let state = Arc::new(config::AppState::new(cfg, store));

    logger::log_server_start(&addr, &state);

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    server::run(listener, state, signals).await;
    Ok(())
}
