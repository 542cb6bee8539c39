//! Which accounts to provision, derived from the environment
//!
//! | Account     | Database | Roles                                                     |
//! |-------------|----------|-----------------------------------------------------------|
//! | application | app      | readWrite@app                                             |
//! | monitor     | app      | read@app                                                  |
//! | admin       | admin    | userAdminAnyDatabase, readWriteAnyDatabase, dbAdminAnyDatabase, clusterAdmin (all @admin) |
//! | backup      | admin    | backup@admin, readAnyDatabase@admin                       |
//!
//! The admin account only exists when `MONGO_ADMIN_USERNAME` is set and is not
//! the root user created by the container entrypoint.

use core_config::{Environment, env_optional};
use serde::Serialize;
use tracing::debug;

use crate::error::{BootstrapError, BootstrapResult};
use crate::models::{ADMIN_DATABASE, AccountKind, AccountSpec, Password, RoleGrant};

pub const DEFAULT_APP_DATABASE: &str = "myapp";
pub const DEFAULT_APP_USERNAME: &str = "appuser";
pub const DEFAULT_APP_PASSWORD: &str = "AppSecurePassword123!";
pub const DEFAULT_MONITOR_USERNAME: &str = "monitor";
pub const DEFAULT_MONITOR_PASSWORD: &str = "MonitorSecurePassword123!";
pub const DEFAULT_BACKUP_USERNAME: &str = "backup";
pub const DEFAULT_BACKUP_PASSWORD: &str = "BackupSecurePassword123!";

const ADMIN_ROLES: [&str; 4] = [
    "userAdminAnyDatabase",
    "readWriteAnyDatabase",
    "dbAdminAnyDatabase",
    "clusterAdmin",
];

const BACKUP_ROLES: [&str; 2] = ["backup", "readAnyDatabase"];

/// Raw provisioning variables; `None` means unset or empty
#[derive(Debug, Clone, Default)]
pub struct PlanInputs {
    pub app_database: Option<String>,
    pub app_username: Option<String>,
    pub app_password: Option<String>,
    pub monitor_username: Option<String>,
    pub monitor_password: Option<String>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub root_username: Option<String>,
    pub backup_username: Option<String>,
    pub backup_password: Option<String>,
}

impl PlanInputs {
    pub fn from_env() -> Self {
        Self {
            app_database: env_optional("MONGO_INITDB_DATABASE"),
            app_username: env_optional("MONGO_APP_USERNAME"),
            app_password: env_optional("MONGO_APP_PASSWORD"),
            monitor_username: env_optional("MONGO_MONITOR_USERNAME"),
            monitor_password: env_optional("MONGO_MONITOR_PASSWORD"),
            admin_username: env_optional("MONGO_ADMIN_USERNAME"),
            admin_password: env_optional("MONGO_ADMIN_PASSWORD"),
            root_username: env_optional("MONGO_INITDB_ROOT_USERNAME"),
            backup_username: env_optional("MONGO_BACKUP_USERNAME"),
            backup_password: env_optional("MONGO_BACKUP_PASSWORD"),
        }
    }
}

/// Resolve a password, refusing the built-in default when secrets are required
fn password(
    value: Option<String>,
    var: &str,
    default: &str,
    environment: &Environment,
) -> BootstrapResult<Password> {
    match value {
        Some(value) => Ok(Password::new(value)),
        None if environment.require_explicit_secrets() => {
            Err(BootstrapError::MissingCredential(var.to_string()))
        }
        None => {
            debug!(var, "Password not set, using development default");
            Ok(Password::new(default))
        }
    }
}

/// Ordered list of accounts to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisioningPlan {
    pub app_database: String,
    pub accounts: Vec<AccountSpec>,
}

impl ProvisioningPlan {
    pub fn from_env(environment: &Environment) -> BootstrapResult<Self> {
        Self::from_inputs(PlanInputs::from_env(), environment)
    }

    pub fn from_inputs(inputs: PlanInputs, environment: &Environment) -> BootstrapResult<Self> {
        let PlanInputs {
            app_database,
            app_username,
            app_password,
            monitor_username,
            monitor_password,
            admin_username,
            admin_password,
            root_username,
            backup_username,
            backup_password,
        } = inputs;

        let app_database = app_database.unwrap_or_else(|| DEFAULT_APP_DATABASE.to_string());
        let mut accounts = Vec::with_capacity(4);

        accounts.push(AccountSpec {
            kind: AccountKind::Application,
            username: app_username.unwrap_or_else(|| DEFAULT_APP_USERNAME.to_string()),
            password: password(app_password, "MONGO_APP_PASSWORD", DEFAULT_APP_PASSWORD, environment)?,
            database: app_database.clone(),
            roles: vec![RoleGrant::new("readWrite", app_database.as_str())],
        });

        accounts.push(AccountSpec {
            kind: AccountKind::Monitor,
            username: monitor_username.unwrap_or_else(|| DEFAULT_MONITOR_USERNAME.to_string()),
            password: password(
                monitor_password,
                "MONGO_MONITOR_PASSWORD",
                DEFAULT_MONITOR_PASSWORD,
                environment,
            )?,
            database: app_database.clone(),
            roles: vec![RoleGrant::new("read", app_database.as_str())],
        });

        match admin_username {
            Some(admin) if root_username.as_deref() == Some(admin.as_str()) => {
                debug!(user = %admin, "Admin username is the root user, skipping admin account");
            }
            Some(admin) => {
                // No development default: an admin account is always deliberate.
                let admin_password = admin_password
                    .ok_or_else(|| BootstrapError::MissingCredential("MONGO_ADMIN_PASSWORD".to_string()))?;

                accounts.push(AccountSpec {
                    kind: AccountKind::Admin,
                    username: admin,
                    password: Password::new(admin_password),
                    database: ADMIN_DATABASE.to_string(),
                    roles: ADMIN_ROLES
                        .iter()
                        .map(|role| RoleGrant::new(*role, ADMIN_DATABASE))
                        .collect(),
                });
            }
            None => {}
        }

        accounts.push(AccountSpec {
            kind: AccountKind::Backup,
            username: backup_username.unwrap_or_else(|| DEFAULT_BACKUP_USERNAME.to_string()),
            password: password(
                backup_password,
                "MONGO_BACKUP_PASSWORD",
                DEFAULT_BACKUP_PASSWORD,
                environment,
            )?,
            database: ADMIN_DATABASE.to_string(),
            roles: BACKUP_ROLES
                .iter()
                .map(|role| RoleGrant::new(*role, ADMIN_DATABASE))
                .collect(),
        });

        Ok(Self {
            app_database,
            accounts,
        })
    }

    pub fn account(&self, kind: AccountKind) -> Option<&AccountSpec> {
        self.accounts.iter().find(|a| a.kind == kind)
    }
}
