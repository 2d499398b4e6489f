pub mod config;
pub mod metrics;
pub mod period;
pub mod station;
