use mongodb::bson::{Bson, Document, doc};
use serde::{Serialize, Serializer};
use std::fmt;
use strum::Display;

/// Privileged namespace for cluster-wide users and commands
pub const ADMIN_DATABASE: &str = "admin";

/// Replica set member state reported for the elected primary
pub const PRIMARY_STATE: &str = "PRIMARY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplicaSetMember {
    pub id: u32,
    pub host: String,
}

/// Replica set configuration sent with `replSetInitiate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplicaSetConfig {
    pub name: String,
    pub members: Vec<ReplicaSetMember>,
}

impl ReplicaSetConfig {
    /// A set with one member, `_id: 0`
    pub fn single_node(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: vec![ReplicaSetMember {
                id: 0,
                host: host.into(),
            }],
        }
    }

    pub fn to_document(&self) -> Document {
        let members: Vec<Bson> = self
            .members
            .iter()
            .map(|m| Bson::Document(doc! { "_id": (m.id as i32), "host": m.host.as_str() }))
            .collect();

        doc! { "_id": self.name.as_str(), "members": members }
    }
}

impl Default for ReplicaSetConfig {
    fn default() -> Self {
        Self::single_node("rs0", "localhost:27017")
    }
}

/// A (role, database) pair granted to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleGrant {
    pub role: String,
    pub db: String,
}

impl RoleGrant {
    pub fn new(role: impl Into<String>, db: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            db: db.into(),
        }
    }

    pub fn to_document(&self) -> Document {
        doc! { "role": self.role.as_str(), "db": self.db.as_str() }
    }
}

/// A password that never shows up in logs or plan output
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

impl Serialize for Password {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("<redacted>")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Application,
    Monitor,
    Admin,
    Backup,
}

/// A user account to provision, identified by (username, database)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSpec {
    pub kind: AccountKind,
    pub username: String,
    pub password: Password,
    pub database: String,
    pub roles: Vec<RoleGrant>,
}

impl AccountSpec {
    pub fn role_documents(&self) -> Vec<Bson> {
        self.roles
            .iter()
            .map(|r| Bson::Document(r.to_document()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberStatus {
    pub name: String,
    pub state_str: String,
    pub health: f64,
}

/// Parsed `replSetGetStatus` reply
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplicaSetStatus {
    pub ok: bool,
    pub set_name: Option<String>,
    pub my_state: Option<i32>,
    pub members: Vec<MemberStatus>,
}

fn as_f64(value: Option<&Bson>) -> Option<f64> {
    match value? {
        Bson::Double(v) => Some(*v),
        Bson::Int32(v) => Some(*v as f64),
        Bson::Int64(v) => Some(*v as f64),
        _ => None,
    }
}

impl ReplicaSetStatus {
    pub fn from_document(reply: &Document) -> Self {
        let members = reply
            .get_array("members")
            .map(|members| {
                members
                    .iter()
                    .filter_map(Bson::as_document)
                    .map(|m| MemberStatus {
                        name: m.get_str("name").unwrap_or_default().to_string(),
                        state_str: m.get_str("stateStr").unwrap_or_default().to_string(),
                        health: as_f64(m.get("health")).unwrap_or(0.0),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            ok: as_f64(reply.get("ok")) == Some(1.0),
            set_name: reply.get_str("set").ok().map(str::to_string),
            my_state: as_f64(reply.get("myState")).map(|s| s as i32),
            members,
        }
    }

    pub fn primary(&self) -> Option<&MemberStatus> {
        self.members.iter().find(|m| m.state_str == PRIMARY_STATE)
    }

    /// Ready for writes: the command succeeded and a primary has been elected
    ///
    /// Stricter than `ok == 1` alone, which a member can report while still
    /// electing itself.
    pub fn is_ready(&self) -> bool {
        self.ok && self.primary().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitiateOutcome {
    Initiated,
    AlreadyInitialized,
    /// Logged and ignored; the readiness gate decides whether to go on
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum UserOutcome {
    Created,
    AlreadyExists,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedAccount {
    pub kind: AccountKind,
    pub username: String,
    pub database: String,
    pub outcome: UserOutcome,
}

/// Summary of a completed bootstrap run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub initiate: InitiateOutcome,
    pub readiness_attempts: u32,
    pub accounts: Vec<ProvisionedAccount>,
}

impl BootstrapReport {
    pub fn count(&self, outcome: UserOutcome) -> usize {
        self.accounts.iter().filter(|a| a.outcome == outcome).count()
    }
}
