//! MongoDB connector and utilities
//!
//! Provides connection management and a liveness probe that works on nodes
//! which are not (yet) replica set members.

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_MONGO_URL, MongoConfig};
pub use connector::{MongoError, connect_from_config, connect_from_config_with_retry};
pub use health::ping;

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Database};
