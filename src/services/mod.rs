pub mod completion;
pub mod rate_limiter;
pub mod relay;
