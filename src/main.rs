use anyhow::Result;
use axum::Router;
use tracing::{info, warn};
use wind_power_service::{api, config, service, telemetry};
use config::Config;
use telemetry::{init_tracing, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(LogFormat::Json);

    let cfg = Config::load()?;
    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!(
            "Server binding to 0.0.0.0 - service will be accessible from network. \
            Bind to 127.0.0.1 unless behind a firewall/reverse proxy."
        );
    }

    let app_state = service::AppState::new(cfg);
    let app: Router = api::router(app_state);

    info!(%addr, "starting wind power service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
