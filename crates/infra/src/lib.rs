//! Infrastructure layer: storage adapters and configuration.

pub mod config;
pub mod memory;

pub use self::config::AppConfig;
pub use memory::{InMemoryDatabase, StoreError};
