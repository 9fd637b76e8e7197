use std::sync::Arc;

use apk_depot::config::{self, AppState};
use apk_depot::logger;
use apk_depot::server::{self, SignalHandler};

const DEFAULT_CONFIG: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Worker threads default to the number of CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let sites = cfg.enabled_sites()?;
    if sites.is_empty() {
        return Err("No site enabled: set portal.enabled or mirror.enabled".into());
    }
    logger::log_startup(&cfg, &sites);

    // Bind everything before serving so a bad port fails the whole start
    let mut bound = Vec::with_capacity(sites.len());
    for site in sites {
        let listener = server::create_listener(site.addr, cfg.server.backlog)
            .map_err(|e| format!("Failed to bind {} site on {}: {e}", site.name(), site.addr))?;
        bound.push((listener, Arc::new(AppState::new(cfg.clone(), site))));
    }

    let signals = Arc::new(SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    let tasks: Vec<_> = bound
        .into_iter()
        .map(|(listener, state)| tokio::spawn(server::run_site(listener, state, Arc::clone(&signals))))
        .collect();

    for task in tasks {
        if let Err(e) = task.await {
            logger::log_error(&format!("Site task failed: {e}"));
        }
    }

    logger::log_info("Server stopped");
    Ok(())
}
