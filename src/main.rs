use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod library;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Size the Tokio runtime from the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("Using {workers} worker threads"));
    } else {
        logger::log_info("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    if !cfg.library.audio_dir.is_dir() {
        logger::log_warning(&format!(
            "Audio directory '{}' does not exist yet; the listing will fail until it does",
            cfg.library.audio_dir.display()
        ));
    }

    logger::log_server_start(&addr, &cfg);

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals), Arc::new(cfg.clone()))?;

    let state = Arc::new(config::AppState::new(cfg));

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run_server(
            listener,
            state,
            Arc::clone(&signals.shutdown),
        ))
        .await
}
