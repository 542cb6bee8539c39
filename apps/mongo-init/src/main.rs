//! MongoDB bootstrapper
//!
//! Initiates a single-node replica set, waits for a primary, and provisions
//! the application, monitoring, admin and backup users. Safe to re-run.

use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::connect_from_config_with_retry;
use domain_cluster_bootstrap::{BootstrapService, MongoClusterAdmin};
use eyre::{Result, WrapErr};
use std::time::Duration;
use tracing::info;

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "mongo-init")]
#[command(about = "Initialize a MongoDB replica set and provision its users")]
struct Cli {
    /// Print the provisioning plan as JSON (passwords redacted) and exit
    #[arg(long)]
    plan: bool,

    /// Reset password and roles of users that already exist
    #[arg(long)]
    reconcile: bool,

    /// Give up if the replica set has no primary after this many seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    ready_timeout_secs: Option<u64>,
}

impl Cli {
    /// Flags take precedence over the environment
    fn apply(&self, config: &mut Config) {
        if self.reconcile {
            config.settings.reconcile_users = true;
        }
        if let Some(secs) = self.ready_timeout_secs {
            config.settings.readiness.timeout = Duration::from_secs(secs);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    cli.apply(&mut config);

    // Plan output goes to stdout alone, before any log line.
    if cli.plan {
        println!("{}", serde_json::to_string_pretty(&config.plan)?);
        return Ok(());
    }

    init_tracing(&config.environment);

    let client = connect_from_config_with_retry(&config.mongodb, None)
        .await
        .wrap_err("Failed to connect to MongoDB")?;

    let service = BootstrapService::new(MongoClusterAdmin::new(client), config.settings);
    let report = service
        .run(&config.plan)
        .await
        .wrap_err("MongoDB initialization failed")?;

    for account in &report.accounts {
        info!(
            kind = %account.kind,
            user = %account.username,
            db = %account.database,
            outcome = %account.outcome,
            "Account provisioned"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_is_the_plain_procedure() {
        let cli = Cli::try_parse_from(["mongo-init"]).unwrap();
        assert!(!cli.plan);
        assert!(!cli.reconcile);
        assert_eq!(cli.ready_timeout_secs, None);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(Cli::try_parse_from(["mongo-init", "--ready-timeout-secs", "0"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        temp_env::with_vars_unset(["APP_ENV", "MONGO_RECONCILE_USERS", "MONGO_READY_TIMEOUT_SECS"], || {
            let mut config = Config::from_env().unwrap();
            let cli = Cli::try_parse_from(["mongo-init", "--reconcile", "--ready-timeout-secs", "15"])
                .unwrap();

            cli.apply(&mut config);

            assert!(config.settings.reconcile_users);
            assert_eq!(config.settings.readiness.timeout, Duration::from_secs(15));
        });
    }
}
