//! Core application infrastructure

pub mod cli;
pub mod config;
pub mod constants;

pub use crate::app::TabulaApp;
pub use cli::{CliConfig, Commands};
pub use config::{EngineConfig, PagingConfig};
