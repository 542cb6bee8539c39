use core_config::{ConfigError, FromEnv, env_optional, env_parse_or};
use database::PollConfig;
use std::time::Duration;

use crate::models::ReplicaSetConfig;

/// How the bootstrap procedure runs, independent of which accounts it creates
#[derive(Debug, Clone)]
pub struct BootstrapSettings {
    pub replica_set: ReplicaSetConfig,
    pub readiness: PollConfig,
    /// Reset password and roles of accounts that already exist
    pub reconcile_users: bool,
}

impl BootstrapSettings {
    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.readiness.timeout = timeout;
        self
    }

    pub fn with_reconcile_users(mut self, reconcile: bool) -> Self {
        self.reconcile_users = reconcile;
        self
    }
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            replica_set: ReplicaSetConfig::default(),
            readiness: PollConfig::default(),
            reconcile_users: false,
        }
    }
}

/// Environment variables:
/// - `MONGO_REPLICA_SET_NAME` (default: `rs0`)
/// - `MONGO_REPLICA_SET_HOST` (default: `localhost:27017`)
/// - `MONGO_READY_POLL_INTERVAL_MS` (default: 1000)
/// - `MONGO_READY_TIMEOUT_SECS` (default: 120, must be positive)
/// - `MONGO_RECONCILE_USERS` (default: false)
impl FromEnv for BootstrapSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let replica_set = ReplicaSetConfig::single_node(
            env_optional("MONGO_REPLICA_SET_NAME").unwrap_or_else(|| "rs0".to_string()),
            env_optional("MONGO_REPLICA_SET_HOST").unwrap_or_else(|| "localhost:27017".to_string()),
        );

        let interval_ms: u64 = env_parse_or("MONGO_READY_POLL_INTERVAL_MS", 1000)?;
        let timeout_secs: u64 = env_parse_or("MONGO_READY_TIMEOUT_SECS", 120)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MONGO_READY_TIMEOUT_SECS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            replica_set,
            readiness: PollConfig::new(
                Duration::from_millis(interval_ms),
                Duration::from_secs(timeout_secs),
            ),
            reconcile_users: env_parse_or("MONGO_RECONCILE_USERS", false)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 5] = [
        "MONGO_REPLICA_SET_NAME",
        "MONGO_REPLICA_SET_HOST",
        "MONGO_READY_POLL_INTERVAL_MS",
        "MONGO_READY_TIMEOUT_SECS",
        "MONGO_RECONCILE_USERS",
    ];

    #[test]
    fn test_settings_defaults() {
        temp_env::with_vars_unset(VARS, || {
            let settings = BootstrapSettings::from_env().unwrap();
            assert_eq!(settings.replica_set, ReplicaSetConfig::single_node("rs0", "localhost:27017"));
            assert_eq!(settings.readiness.interval, Duration::from_millis(1000));
            assert_eq!(settings.readiness.timeout, Duration::from_secs(120));
            assert!(!settings.reconcile_users);
        });
    }

    #[test]
    fn test_settings_from_env() {
        temp_env::with_vars(
            [
                ("MONGO_REPLICA_SET_NAME", Some("rs-prod")),
                ("MONGO_REPLICA_SET_HOST", Some("mongo-0.mongo:27017")),
                ("MONGO_READY_POLL_INTERVAL_MS", Some("250")),
                ("MONGO_READY_TIMEOUT_SECS", Some("30")),
                ("MONGO_RECONCILE_USERS", Some("true")),
            ],
            || {
                let settings = BootstrapSettings::from_env().unwrap();
                assert_eq!(settings.replica_set.name, "rs-prod");
                assert_eq!(settings.replica_set.members[0].host, "mongo-0.mongo:27017");
                assert_eq!(settings.readiness.interval, Duration::from_millis(250));
                assert_eq!(settings.readiness.timeout, Duration::from_secs(30));
                assert!(settings.reconcile_users);
            },
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        temp_env::with_var("MONGO_READY_TIMEOUT_SECS", Some("0"), || {
            let err = BootstrapSettings::from_env().unwrap_err();
            assert!(err.to_string().contains("MONGO_READY_TIMEOUT_SECS"));
        });
    }

    #[test]
    fn test_invalid_reconcile_flag() {
        temp_env::with_var("MONGO_RECONCILE_USERS", Some("maybe"), || {
            assert!(BootstrapSettings::from_env().is_err());
        });
    }

    #[test]
    fn test_builder_overrides() {
        let settings = BootstrapSettings::default()
            .with_ready_timeout(Duration::from_secs(5))
            .with_reconcile_users(true);
        assert_eq!(settings.readiness.timeout, Duration::from_secs(5));
        assert!(settings.reconcile_users);
    }
}
