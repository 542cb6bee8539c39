//! Configuration for the bootstrapper

use core_config::FromEnv;
use database::mongodb::MongoConfig;
use domain_cluster_bootstrap::{BootstrapSettings, ProvisioningPlan};
use eyre::Result;

pub use core_config::Environment;

/// Everything the bootstrapper reads from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub mongodb: MongoConfig,
    pub settings: BootstrapSettings,
    pub plan: ProvisioningPlan,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// The provisioning plan is resolved here so that a missing credential is
    /// reported before any connection attempt.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let settings = BootstrapSettings::from_env()?;
        let plan = ProvisioningPlan::from_env(&environment)?;

        Ok(Self {
            environment,
            mongodb,
            settings,
            plan,
        })
    }
}
