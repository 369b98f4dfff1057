//! Per-client submission throttling for the routes that change the roster
//! or the shared form.

use std::{
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;

use crate::errors::AppError;
use crate::logging::{RegistryEvent, SanitizedIpAddr};

/// Submissions one client may make inside a window of `span`.
#[derive(Debug, Clone, Copy)]
struct Quota {
    limit: u32,
    span: Duration,
}

#[derive(Debug)]
struct RateWindow {
    opened_at: Instant,
    used: u32,
}

impl RateWindow {
    fn opened(now: Instant) -> Self {
        Self {
            opened_at: now,
            used: 0,
        }
    }

    fn has_lapsed(&self, now: Instant, span: Duration) -> bool {
        now.saturating_duration_since(self.opened_at) >= span
    }

    /// Spends one submission, reopening the window first if it has lapsed.
    fn spend(&mut self, now: Instant, quota: Quota) -> Result<(), Duration> {
        if self.has_lapsed(now, quota.span) {
            *self = Self::opened(now);
        }

        if self.used >= quota.limit {
            let elapsed = now.saturating_duration_since(self.opened_at);
            return Err(quota.span.saturating_sub(elapsed));
        }

        self.used += 1;
        Ok(())
    }
}

/// Fixed-window submission counter keyed by client address.
///
/// The client is the socket peer unless forwarded headers are trusted.
/// Lapsed windows are dropped at most once per window length.
#[derive(Clone)]
pub struct SubmitRateLimiter {
    quota: Quota,
    trust_forwarded: bool,
    windows: Arc<DashMap<IpAddr, RateWindow>>,
    last_sweep: Arc<Mutex<Instant>>,
}

impl SubmitRateLimiter {
    pub fn new(burst: NonZeroU32, span: Duration) -> Self {
        Self {
            quota: Quota {
                limit: burst.get(),
                span,
            },
            trust_forwarded: false,
            windows: Arc::new(DashMap::new()),
            last_sweep: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Only enable behind a reverse proxy that overwrites these headers.
    pub fn trust_forwarded_headers(mut self, trust: bool) -> Self {
        self.trust_forwarded = trust;
        self
    }

    /// Counts one submission; `Err` carries how long until the window reopens.
    fn register(&self, ip: IpAddr, now: Instant) -> Result<(), Duration> {
        self.sweep_lapsed(now);

        self.windows
            .entry(ip)
            .or_insert_with(|| RateWindow::opened(now))
            .spend(now, self.quota)
    }

    fn sweep_lapsed(&self, now: Instant) {
        // Another request is already sweeping.
        let Ok(mut last_sweep) = self.last_sweep.try_lock() else {
            return;
        };
        if now.saturating_duration_since(*last_sweep) < self.quota.span {
            return;
        }

        let before = self.windows.len();
        self.windows
            .retain(|_, window| !window.has_lapsed(now, self.quota.span));
        *last_sweep = now;

        tracing::debug!(
            dropped = before.saturating_sub(self.windows.len()),
            tracked = self.windows.len(),
            "Swept lapsed rate limit windows"
        );
    }

    fn client_ip(&self, headers: &HeaderMap, peer: IpAddr) -> IpAddr {
        if self.trust_forwarded {
            forwarded_client(headers).unwrap_or(peer)
        } else {
            peer
        }
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

pub async fn enforce_rate_limit(
    State(limiter): State<SubmitRateLimiter>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client_ip = limiter.client_ip(request.headers(), peer.ip());

    if let Err(retry_after) = limiter.register(client_ip, Instant::now()) {
        crate::log_registry_event!(
            RegistryEvent::SubmissionRateLimited,
            client_ip = %SanitizedIpAddr::new(client_ip),
            retry_after_secs = retry_after.as_secs(),
            "Submission rate limit exceeded"
        );

        return Err(AppError::RateLimitExceeded {
            retry_after: Some(retry_after.max(Duration::from_secs(1))),
        });
    }

    Ok(next.run(request).await)
}

/// First hop of `X-Forwarded-For`, else `X-Real-IP`.
fn forwarded_client(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.split(',').next())
        .and_then(|ip| ip.trim().parse().ok());

    forwarded.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .and_then(|ip| ip.trim().parse().ok())
    })
}
