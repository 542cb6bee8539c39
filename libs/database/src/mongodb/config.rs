use std::fmt;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_optional, env_parse_or};

/// Default connection string for a node that may not be a replica set member yet.
///
/// `directConnection` stops the driver from running replica set discovery,
/// which would never select a server before `replSetInitiate` has run.
pub const DEFAULT_MONGO_URL: &str = "mongodb://localhost:27017/?directConnection=true";

/// MongoDB connection settings
///
/// Can be constructed manually or loaded from environment variables (with the
/// `config` feature). The password never appears in `Debug` output.
#[derive(Clone)]
pub struct MongoConfig {
    /// Connection string
    /// Format: mongodb://[username:password@]host[:port][/database][?options]
    pub url: String,

    /// Application name reported in server logs
    pub app_name: Option<String>,

    /// Username authenticated against the `admin` database
    pub username: Option<String>,

    /// Password for `username`
    pub password: Option<String>,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Server selection timeout in seconds
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    /// Create a config for `url` with default timeouts and no credential
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Authenticate as `username` against the `admin` database
    pub fn with_credential(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Username and password, when both are configured
    pub fn credential(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_MONGO_URL.to_string(),
            app_name: None,
            username: None,
            password: None,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }
}

impl fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoConfig")
            .field("url", &self.url)
            .field("app_name", &self.app_name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("server_selection_timeout_secs", &self.server_selection_timeout_secs)
            .finish()
    }
}

/// Load MongoConfig from environment variables
///
/// Environment variables:
/// - `MONGO_URI` or `MONGODB_URL` (optional, default: [`DEFAULT_MONGO_URL`])
/// - `MONGO_INITDB_ROOT_USERNAME` / `MONGO_INITDB_ROOT_PASSWORD` (optional) -
///   connection credential, used only when both are set
/// - `MONGODB_APP_NAME` (optional, default: `mongo-init`)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (optional, default: 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (optional, default: 30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_optional("MONGO_URI")
            .or_else(|| env_optional("MONGODB_URL"))
            .unwrap_or_else(|| DEFAULT_MONGO_URL.to_string());

        let mut config = Self::new(url);

        if let (Some(username), Some(password)) = (
            env_optional("MONGO_INITDB_ROOT_USERNAME"),
            env_optional("MONGO_INITDB_ROOT_PASSWORD"),
        ) {
            config = config.with_credential(username, password);
        }

        config.app_name = Some(env_optional("MONGODB_APP_NAME").unwrap_or_else(|| "mongo-init".to_string()));
        config.connect_timeout_secs = env_parse_or("MONGODB_CONNECT_TIMEOUT_SECS", 10)?;
        config.server_selection_timeout_secs =
            env_parse_or("MONGODB_SERVER_SELECTION_TIMEOUT_SECS", 30)?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mongo_config_default() {
        let config = MongoConfig::default();
        assert_eq!(config.url(), DEFAULT_MONGO_URL);
        assert!(config.credential().is_none());
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.server_selection_timeout_secs, 30);
    }

    #[test]
    fn test_mongo_config_with_credential() {
        let config = MongoConfig::new("mongodb://db:27017").with_credential("root", "s3cret");
        assert_eq!(config.credential(), Some(("root", "s3cret")));
    }

    #[test]
    fn test_mongo_config_debug_redacts_password() {
        let config = MongoConfig::default()
            .with_credential("root", "s3cret")
            .with_app_name("mongo-init");
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("root"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("s3cret"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env_defaults() {
        temp_env::with_vars(
            [
                ("MONGO_URI", None::<&str>),
                ("MONGODB_URL", None),
                ("MONGO_INITDB_ROOT_USERNAME", None),
                ("MONGO_INITDB_ROOT_PASSWORD", None),
                ("MONGODB_APP_NAME", None),
                ("MONGODB_CONNECT_TIMEOUT_SECS", None),
                ("MONGODB_SERVER_SELECTION_TIMEOUT_SECS", None),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url, DEFAULT_MONGO_URL);
                assert_eq!(config.app_name.as_deref(), Some("mongo-init"));
                assert!(config.credential().is_none());
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env_fallback_url_and_credential() {
        temp_env::with_vars(
            [
                ("MONGO_URI", None::<&str>),
                ("MONGODB_URL", Some("mongodb://fallback:27017")),
                ("MONGO_INITDB_ROOT_USERNAME", Some("root")),
                ("MONGO_INITDB_ROOT_PASSWORD", Some("example")),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url, "mongodb://fallback:27017");
                assert_eq!(config.credential(), Some(("root", "example")));
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_root_username_alone_is_not_a_credential() {
        temp_env::with_vars(
            [
                ("MONGO_INITDB_ROOT_USERNAME", Some("root")),
                ("MONGO_INITDB_ROOT_PASSWORD", None::<&str>),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert!(config.credential().is_none());
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env_bad_timeout() {
        temp_env::with_var("MONGODB_CONNECT_TIMEOUT_SECS", Some("ten"), || {
            let err = MongoConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("MONGODB_CONNECT_TIMEOUT_SECS"));
        });
    }
}
