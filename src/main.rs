use anyhow::Result;
use clap::Parser;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

mod aggregator;
mod catalog;
mod cli;
mod config;
mod error;
mod geoip;
mod limiter;
mod phone;
mod prober;
mod server;
mod service;
mod session;
mod types;
mod validate;

use cli::Args;
use server::AppState;
use types::Config;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

const BANNER: &str = r#"
  _    _            _   _ _
 (_)__| |___ _ _  _| |_(_) |_ _ _ __ _ __ ___
 | / _` / -_) ' \|  _| |  _| '_/ _` / _/ -_)
 |_\__,_\___|_||_|\__|_|\__|_| \__,_\__\___|

        Identifier enrichment API
     IP / phone / username lookups
"#;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    if !args.silent && atty::is(atty::Stream::Stdout) {
        println!("{}", BANNER);
    }

    let mut config = if let Some(config_path) = args.config_path.as_deref() {
        config::load_config(config_path)?
    } else {
        Config::default()
    };
    config::apply_cli_overrides(&mut config, &args);

    let sweep_interval = Duration::from_secs(config.rate_limit.sweep_interval_secs);
    let state = Arc::new(AppState::new(config.clone())?);

    info!(
        "{} v{} ({} platforms, limit {} req/{}s, probe timeout {}s)",
        NAME,
        VERSION,
        state.service.catalog().len(),
        config.rate_limit.max_requests,
        config.rate_limit.window_secs,
        config.probe.timeout_secs
    );

    // Periodically drop limiter entries for idle clients
    let sweep_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            sweep_state.limiter.sweep();
        }
    });

    let app = server::router(state);

    let addr = format!("{}:{}", config.server.bind_addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
