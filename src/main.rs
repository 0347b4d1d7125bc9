use std::sync::Arc;
use tokio::sync::Notify;

use frontdesk::config::Config;
use frontdesk::error::Result;
use frontdesk::{logger, server, AppState};

fn main() -> Result<()> {
    // Optional config path (without extension) as the only argument
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg.logging)?;

    // Build the Tokio runtime, worker count from config when given
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    match cfg.server.workers {
        Some(workers) if workers > 0 => {
            runtime_builder.worker_threads(workers);
        }
        Some(_) => tracing::warn!("server.workers = 0 ignored, using one thread per CPU core"),
        None => {}
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<()> {
    let addr = cfg.socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    if !cfg.static_files.root.is_dir() {
        tracing::warn!(
            "Static root '{}' is not a directory, every GET will answer 404",
            cfg.static_files.root.display()
        );
    }

    logger::log_server_start(&listener.local_addr()?, &cfg);

    let state = Arc::new(AppState::new(cfg));
    let shutdown = Arc::new(Notify::new());
    server::spawn_shutdown_listener(Arc::clone(&shutdown));

    server::run(listener, state, shutdown).await?;
    tracing::info!("frontdesk stopped");
    Ok(())
}
