//! Database library providing MongoDB connection management and polling utilities
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB connector, config and health check
//! - `config` - Configuration support with `core_config::FromEnv`
//!
//! # Examples
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::new("mongodb://localhost:27017/?directConnection=true");
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let admin = client.database("admin");
//! ```
//!
//! Waiting for a condition with a deadline:
//!
//! ```ignore
//! use database::common::{PollConfig, poll_until};
//!
//! let attempts = poll_until(|_| async { is_ready().await }, &PollConfig::default()).await?;
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{PollConfig, PollTimeout, RetryConfig};
