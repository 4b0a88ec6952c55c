// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::completion::CompletionService;
use crate::services::rate_limiter::RateLimiter;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub completions: Arc<dyn CompletionService>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: Config, completions: Arc<dyn CompletionService>) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit_window, config.rate_limit_max);
        Self {
            config,
            completions,
            rate_limiter,
        }
    }
}
