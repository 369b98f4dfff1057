use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::connect_info::MockConnectInfo,
    http::Response,
};
use serde_json::Value;

use crate::config::AppConfig;
use crate::security::rate_limit::SubmitRateLimiter;
use crate::state::AppState;

pub(crate) fn test_app() -> (Router, AppState) {
    test_app_with_limit(NonZeroU32::new(100).unwrap())
}

pub(crate) fn test_app_with_limit(burst: NonZeroU32) -> (Router, AppState) {
    let state = AppState::new(&AppConfig::default());
    let limiter = SubmitRateLimiter::new(burst, Duration::from_secs(60));
    let router = super::create_router(state.clone(), limiter)
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
    (router, state)
}

pub(crate) async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub(crate) async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
