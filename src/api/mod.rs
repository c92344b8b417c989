//! API Module
//!
//! - commands.rs: `ScanService`, the surface the navigation hook and CLI use
//!
//! Usage:
//! - `api::ScanService::new(EngineConfig::from_env())`
//! - `service.should_skip(url)` before `service.scan_with_timeout(url, html)`

pub mod commands;

pub use commands::*;
