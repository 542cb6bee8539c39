//! Bootstrap Service - the initiate / wait / provision procedure

use database::common::poll_until;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::error::{AdminErrorKind, BootstrapError, BootstrapResult};
use crate::models::{
    AccountKind, AccountSpec, BootstrapReport, InitiateOutcome, ProvisionedAccount, UserOutcome,
};
use crate::plan::ProvisioningPlan;
use crate::repository::ClusterAdmin;
use crate::settings::BootstrapSettings;

/// Runs the bootstrap procedure against a [`ClusterAdmin`]
///
/// Every step is safe to repeat: an initiated replica set and existing users
/// are recognised and skipped (or reconciled, see
/// [`BootstrapSettings::reconcile_users`]).
pub struct BootstrapService<A: ClusterAdmin> {
    admin: Arc<A>,
    settings: BootstrapSettings,
}

impl<A: ClusterAdmin> BootstrapService<A> {
    pub fn new(admin: A, settings: BootstrapSettings) -> Self {
        Self {
            admin: Arc::new(admin),
            settings,
        }
    }

    /// Initiate the replica set. Never fails: errors are logged and the
    /// readiness gate decides whether the cluster is usable.
    #[instrument(skip(self), fields(set = %self.settings.replica_set.name))]
    pub async fn initiate_replica_set(&self) -> InitiateOutcome {
        match self
            .admin
            .initiate_replica_set(&self.settings.replica_set)
            .await
        {
            Ok(()) => {
                info!("Replica set initialized");
                InitiateOutcome::Initiated
            }
            Err(e) if e.is(AdminErrorKind::AlreadyInitialized) => {
                info!(error = %e.message, "Replica set already initialized");
                InitiateOutcome::AlreadyInitialized
            }
            Err(e) => {
                warn!(error = %e, "Replica set initiation failed, continuing");
                InitiateOutcome::Failed(e.message)
            }
        }
    }

    /// Poll `replSetGetStatus` until a primary is elected or the deadline passes.
    ///
    /// Returns the number of status probes it took.
    #[instrument(skip(self))]
    pub async fn wait_until_ready(&self) -> BootstrapResult<u32> {
        let admin = Arc::clone(&self.admin);

        let result = poll_until(
            |attempt| {
                let admin = Arc::clone(&admin);
                async move {
                    match admin.replica_set_status().await {
                        Ok(status) if status.is_ready() => true,
                        Ok(status) => {
                            info!(attempt, my_state = ?status.my_state, "Waiting for replica set to be ready...");
                            false
                        }
                        Err(e) if e.is(AdminErrorKind::NotYetInitialized) => {
                            info!(attempt, "Waiting for replica set to be ready (not yet initialized)...");
                            false
                        }
                        Err(e) => {
                            warn!(attempt, error = %e, "Waiting for replica set to be ready...");
                            false
                        }
                    }
                }
            },
            &self.settings.readiness,
        )
        .await;

        match result {
            Ok(attempts) => {
                info!(attempts, "Replica set is ready");
                Ok(attempts)
            }
            Err(timeout) => Err(BootstrapError::ReadinessTimeout {
                attempts: timeout.attempts,
                waited: timeout.elapsed,
            }),
        }
    }

    /// Create one account, treating "already exists" as success.
    #[instrument(skip(self, account), fields(user = %account.username, db = %account.database, kind = %account.kind))]
    pub async fn provision_account(&self, account: &AccountSpec) -> BootstrapResult<UserOutcome> {
        match self.admin.create_user(account).await {
            Ok(()) => {
                info!("User created");
                Ok(UserOutcome::Created)
            }
            Err(e) if e.is(AdminErrorKind::UserAlreadyExists) => {
                if self.settings.reconcile_users {
                    self.admin.update_user(account).await?;
                    info!("User already existed, password and roles reconciled");
                    Ok(UserOutcome::Updated)
                } else {
                    info!("User already exists, skipping");
                    Ok(UserOutcome::AlreadyExists)
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Provision the plan's accounts in order, stopping at the first failure.
    ///
    /// Accounts created before a failure are left in place.
    #[instrument(skip(self, plan), fields(app_db = %plan.app_database, accounts = plan.accounts.len()))]
    pub async fn provision_users(
        &self,
        plan: &ProvisioningPlan,
    ) -> BootstrapResult<Vec<ProvisionedAccount>> {
        let mut provisioned = Vec::with_capacity(plan.accounts.len());

        for account in &plan.accounts {
            let outcome = self.provision_account(account).await?;

            if account.kind == AccountKind::Admin && outcome == UserOutcome::Created {
                info!("Admin user created");
            }

            provisioned.push(ProvisionedAccount {
                kind: account.kind,
                username: account.username.clone(),
                database: account.database.clone(),
                outcome,
            });
        }

        Ok(provisioned)
    }

    /// Initiate, wait for readiness, then provision every account in `plan`.
    pub async fn run(&self, plan: &ProvisioningPlan) -> BootstrapResult<BootstrapReport> {
        info!("Starting MongoDB initialization...");

        let initiate = self.initiate_replica_set().await;
        let readiness_attempts = self.wait_until_ready().await?;
        let accounts = self.provision_users(plan).await?;

        let report = BootstrapReport {
            initiate,
            readiness_attempts,
            accounts,
        };

        info!(
            created = report.count(UserOutcome::Created),
            existing = report.count(UserOutcome::AlreadyExists),
            updated = report.count(UserOutcome::Updated),
            "MongoDB initialization completed successfully"
        );

        Ok(report)
    }
}
