// Library for the agent binary and integration tests

pub mod aggregator;
pub mod collectors;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod public_ip;
pub mod reporter;
pub mod sysinfo_repo;
pub mod units;
pub mod version;
pub mod worker;
