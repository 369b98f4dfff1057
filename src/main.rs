mod config;
mod errors;
mod form;
mod logging;
mod models;
mod page;
mod reference;
mod routes;
mod security;
mod state;
mod views;

use std::net::SocketAddr;

use axum::serve;
use config::AppConfig;
use routes::create_router;
use security::rate_limit::SubmitRateLimiter;
use state::AppState;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    let state = AppState::new(&config);
    let limiter = SubmitRateLimiter::new(config.submit_burst, config.submit_window)
        .trust_forwarded_headers(config.trust_forwarded);
    let app = create_router(state, limiter).into_make_service_with_connect_info::<SocketAddr>();

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, min_age = config.min_age, "User registry listening");

    serve(listener, app).await?;

    Ok(())
}
