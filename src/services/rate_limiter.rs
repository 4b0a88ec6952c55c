// src/services/rate_limiter.rs
use std::{
    collections::HashMap,
    fmt::Debug,
    net::IpAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;

#[derive(Clone, Copy, Debug)]
struct Window {
    started: Instant,
    hits: u32,
}

/// Outcome of counting one request against its client's window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

/// Fixed-window request counter keyed by client IP.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<RwLock<HashMap<IpAddr, Window>>>,
    window: Duration,
    max: u32,
}

impl Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("window", &self.window)
            .field("max", &self.max)
            .finish()
    }
}

impl RateLimiter {
    pub fn new(window: Duration, max: u32) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            window,
            max,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Counts a hit for `ip`, opening a new window if the old one ran out.
    pub async fn check(&self, ip: IpAddr) -> RateDecision {
        let now = Instant::now();
        let mut guard = self.inner.write().await;
        let entry = guard.entry(ip).or_insert(Window { started: now, hits: 0 });

        if now.duration_since(entry.started) >= self.window {
            *entry = Window { started: now, hits: 0 };
        }
        entry.hits = entry.hits.saturating_add(1);

        RateDecision {
            allowed: entry.hits <= self.max,
            limit: self.max,
            remaining: self.max.saturating_sub(entry.hits),
            reset_after: self.window.saturating_sub(now.duration_since(entry.started)),
        }
    }

    /// Drop windows that have run out. Returns number removed.
    pub async fn purge_expired(&self) -> usize {
        let mut guard = self.inner.write().await;
        let now = Instant::now();
        let before = guard.len();
        guard.retain(|_, w| now.duration_since(w.started) < self.window);
        before - guard.len()
    }

    /// Number of clients currently tracked.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

/// Whole seconds, rounded up so clients never retry inside the window.
pub fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}
