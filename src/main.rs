use clap::Parser;
use std::path::Path;
use std::sync::Arc;

mod config;
mod db;
mod error;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

/// Minimal JSON API server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Configuration file (TOML, extension optional)
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Key/value settings file with database credentials
    #[arg(short, long, default_value = ".env")]
    settings: String,

    /// Only test the database connection, then exit
    #[arg(long)]
    check_db: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = config::Settings::load(Path::new(&cli.settings))?;
    let cfg = config::Config::load_with(&cli.config, &settings)?;
    logger::init(&cfg)?;
    for key in settings.unknown_keys() {
        logger::log_debug(&format!("Ignoring unknown setting: {key}"));
    }

    // Worker thread count follows the `server.workers` setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    if cli.check_db {
        return runtime.block_on(async {
            db::probe(&cfg.database)
                .await
                .map_err(|e| -> Box<dyn std::error::Error> {
                    logger::log_error(&e.to_string());
                    e.into()
                })
        });
    }

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.database.probe_on_startup {
        db::probe(&cfg.database).await?;
    }

    let routes = handler::build_route_table()?;
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    logger::log_server_start(&addr, &cfg);
    logger::log_routes(routes.routes());

    let state = Arc::new(config::AppState::new(cfg, routes));
    server::start_server_loop(listener, state, server::shutdown_signal()).await?;
    Ok(())
}
