//! MongoDB implementation of ClusterAdmin

use async_trait::async_trait;
use mongodb::{
    Client,
    bson::{Document, doc},
    error::{Error as DriverError, ErrorKind},
};
use tracing::instrument;

use crate::error::AdminError;
use crate::models::{ADMIN_DATABASE, AccountSpec, ReplicaSetConfig, ReplicaSetStatus};
use crate::repository::ClusterAdmin;

/// Runs administrative commands through a connected driver client
#[derive(Clone)]
pub struct MongoClusterAdmin {
    client: Client,
}

impl MongoClusterAdmin {
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017/?directConnection=true").await?;
    /// let admin = MongoClusterAdmin::new(client);
    /// ```
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn run(&self, database: &str, name: &'static str, command: Document) -> Result<Document, AdminError> {
        self.client
            .database(database)
            .run_command(command)
            .await
            .map_err(|e| admin_error(name, &e))
    }

    fn create_user_command(account: &AccountSpec) -> Document {
        doc! {
            "createUser": account.username.as_str(),
            "pwd": account.password.expose(),
            "roles": account.role_documents()
        }
    }

    fn update_user_command(account: &AccountSpec) -> Document {
        doc! {
            "updateUser": account.username.as_str(),
            "pwd": account.password.expose(),
            "roles": account.role_documents()
        }
    }
}

/// Keep the server's code for command errors; everything else (network,
/// auth handshake, server selection) is reported by its message only.
fn admin_error(command: &'static str, err: &DriverError) -> AdminError {
    match err.kind.as_ref() {
        ErrorKind::Command(command_error) => {
            AdminError::new(command, Some(command_error.code), command_error.message.clone())
        }
        _ => AdminError::new(command, None, err.to_string()),
    }
}

#[async_trait]
impl ClusterAdmin for MongoClusterAdmin {
    #[instrument(skip(self, config), fields(set = %config.name))]
    async fn initiate_replica_set(&self, config: &ReplicaSetConfig) -> Result<(), AdminError> {
        self.run(
            ADMIN_DATABASE,
            "replSetInitiate",
            doc! { "replSetInitiate": config.to_document() },
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn replica_set_status(&self) -> Result<ReplicaSetStatus, AdminError> {
        let reply = self
            .run(ADMIN_DATABASE, "replSetGetStatus", doc! { "replSetGetStatus": 1 })
            .await?;
        Ok(ReplicaSetStatus::from_document(&reply))
    }

    #[instrument(skip(self, account), fields(user = %account.username, db = %account.database))]
    async fn create_user(&self, account: &AccountSpec) -> Result<(), AdminError> {
        self.run(&account.database, "createUser", Self::create_user_command(account))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, account), fields(user = %account.username, db = %account.database))]
    async fn update_user(&self, account: &AccountSpec) -> Result<(), AdminError> {
        self.run(&account.database, "updateUser", Self::update_user_command(account))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountKind, Password, RoleGrant};

    fn backup_account() -> AccountSpec {
        AccountSpec {
            kind: AccountKind::Backup,
            username: "backup".to_string(),
            password: Password::new("BackupSecurePassword123!"),
            database: "admin".to_string(),
            roles: vec![
                RoleGrant::new("backup", "admin"),
                RoleGrant::new("readAnyDatabase", "admin"),
            ],
        }
    }

    #[test]
    fn test_create_user_command() {
        let command = MongoClusterAdmin::create_user_command(&backup_account());
        assert_eq!(
            command,
            doc! {
                "createUser": "backup",
                "pwd": "BackupSecurePassword123!",
                "roles": [
                    { "role": "backup", "db": "admin" },
                    { "role": "readAnyDatabase", "db": "admin" }
                ]
            }
        );
        // command name must be the first key
        assert_eq!(command.keys().next().map(String::as_str), Some("createUser"));
    }

    #[test]
    fn test_update_user_command() {
        let command = MongoClusterAdmin::update_user_command(&backup_account());
        assert_eq!(command.get_str("updateUser").unwrap(), "backup");
        assert_eq!(command.get_array("roles").unwrap().len(), 2);
    }
}
