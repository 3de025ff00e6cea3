use std::sync::Arc;
use tokio::sync::Notify;

mod config;
mod handler;
mod http;
mod logger;
mod page;
mod render;
mod server;

const CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load_from(CONFIG_PATH)?;
    logger::init(&cfg)?;

    // Size the Tokio runtime from the workers setting
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

    // Templates are loaded before binding; a missing or broken one aborts startup
    let state = match config::AppState::new(&cfg) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            logger::log_error(&format!("Failed to load templates: {e}"));
            return Err(e.into());
        }
    };

    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown));
    server::start_server_loop(listener, state, shutdown).await;

    Ok(())
}
