use async_trait::async_trait;

use crate::error::AdminError;
use crate::models::{AccountSpec, ReplicaSetConfig, ReplicaSetStatus};

/// Administrative command interface of the cluster
///
/// Each method maps to one server command. Implementations return the raw,
/// classified failure; deciding which failures are benign is left to
/// [`BootstrapService`](crate::service::BootstrapService).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterAdmin: Send + Sync {
    /// `replSetInitiate` on the admin database
    async fn initiate_replica_set(&self, config: &ReplicaSetConfig) -> Result<(), AdminError>;

    /// `replSetGetStatus` on the admin database
    async fn replica_set_status(&self) -> Result<ReplicaSetStatus, AdminError>;

    /// `createUser` on the account's database
    async fn create_user(&self, account: &AccountSpec) -> Result<(), AdminError>;

    /// `updateUser` on the account's database, replacing password and roles
    async fn update_user(&self, account: &AccountSpec) -> Result<(), AdminError>;
}
