//! bedtime - sunrise-based bedtime service
//!
//! This is the composition root that wires together all the components.

use bedtime::adapters::inbound::{ApiServer, ApiState};
use bedtime::adapters::outbound::{DashMapLocationCache, IpApiGeoLocator, SunriseSunsetClient};
use bedtime::application::{bedtime_presenter, BedtimePresenter, LocationResolver, SunriseProxy};
use bedtime::config::{load_config, Config};
use bedtime::infrastructure::{build_http_client, shutdown_signal, ShutdownController};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;

/// Tells you when to go to bed so you wake up with the sun.
#[derive(Parser)]
#[command(name = "bedtime")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Ask a running server for tonight's bedtime and print it
    Show {
        /// Base URL of the bedtime server
        #[arg(long, env = "BEDTIME_BASE_URL", default_value = "http://127.0.0.1:3000")]
        base_url: String,
        /// Client address to report via x-forwarded-for
        #[arg(long)]
        forwarded_for: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(cfg).await,
        Commands::Show {
            base_url,
            forwarded_for,
        } => show(&cfg, base_url, forwarded_for).await,
    }
}

async fn serve(cfg: Config) -> anyhow::Result<()> {
    tracing::info!(
        "starting bedtime listen={} geo_api={} sunrise_api={}",
        cfg.listen_addr,
        cfg.geo_api_url,
        cfg.sunrise_api_url
    );

    // ===== COMPOSITION ROOT =====

    let controller = ShutdownController::new();
    let client = build_http_client(Duration::from_secs(cfg.upstream_timeout_secs))?;

    // 1. Outbound adapters
    let cache = Arc::new(DashMapLocationCache::new(Duration::from_secs(
        cfg.location_cache_ttl_secs,
    )));
    let sweeper = if cfg.cache_sweep_interval_secs > 0 {
        Some(cache.start_sweeper(
            Duration::from_secs(cfg.cache_sweep_interval_secs),
            controller.subscribe(),
        ))
    } else {
        None
    };

    let geo_locator = Arc::new(IpApiGeoLocator::new(cfg.geo_api_url.clone(), client.clone()));
    let sunrise_client = Arc::new(SunriseSunsetClient::new(cfg.sunrise_api_url.clone(), client));

    // 2. Application services
    let resolver = Arc::new(LocationResolver::new(geo_locator, cache));
    let sunrise = Arc::new(SunriseProxy::new(sunrise_client));

    // 3. Inbound adapter
    let server = ApiServer::new(
        cfg.listen_addr.clone(),
        ApiState::new(resolver.clone(), sunrise),
        cfg.cors_enabled,
    );

    tokio::spawn(shutdown_signal(controller.clone()));
    let result = server.run(controller.wait()).await;

    // Stops the sweeper and the signal task when the server exits on its own
    controller.shutdown();
    if let Some(handle) = sweeper {
        let _ = handle.await;
    }
    resolver.clear_cache();
    tracing::info!("location cache cleared, bye");

    result
}

async fn show(
    cfg: &Config,
    base_url: String,
    forwarded_for: Option<String>,
) -> anyhow::Result<()> {
    let client = build_http_client(Duration::from_secs(cfg.upstream_timeout_secs))?;
    let mut presenter = BedtimePresenter::new(base_url, client);
    if let Some(ip) = forwarded_for {
        presenter = presenter.with_forwarded_for(ip);
    }

    match presenter.fetch().await {
        Ok(bedtime) => {
            println!("{}", bedtime_presenter::render(&bedtime));
            Ok(())
        }
        Err(e) => {
            println!("{}", bedtime_presenter::render_error(&e));
            std::process::exit(1);
        }
    }
}
