//! Cluster Bootstrap Domain
//!
//! One-shot administrative setup of a MongoDB deployment: initiate a
//! single-node replica set, wait until it has a primary, then create the
//! application, monitoring, optional admin and backup accounts.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ ProvisioningPlan │  ← accounts and roles, from environment
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │ BootstrapService │  ← initiate / wait / provision, idempotency rules
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │   ClusterAdmin   │  ← admin commands (trait + MongoDB implementation)
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::{Environment, FromEnv};
//! use domain_cluster_bootstrap::{
//!     BootstrapService, BootstrapSettings, MongoClusterAdmin, ProvisioningPlan,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017/?directConnection=true").await?;
//! let plan = ProvisioningPlan::from_env(&Environment::from_env())?;
//!
//! let service = BootstrapService::new(MongoClusterAdmin::new(client), BootstrapSettings::from_env()?);
//! let report = service.run(&plan).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod mongodb;
pub mod plan;
pub mod repository;
pub mod service;
pub mod settings;

// Re-export commonly used types
pub use error::{AdminError, AdminErrorKind, BootstrapError, BootstrapResult};
pub use models::{
    AccountKind, AccountSpec, BootstrapReport, InitiateOutcome, ProvisionedAccount,
    ReplicaSetConfig, ReplicaSetStatus, RoleGrant, UserOutcome,
};
pub use mongodb::MongoClusterAdmin;
pub use plan::{PlanInputs, ProvisioningPlan};
pub use repository::ClusterAdmin;
pub use service::BootstrapService;
pub use settings::BootstrapSettings;
