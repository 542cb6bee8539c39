//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper running `mongod --replSet` in a container,
//! left uninitiated so tests can exercise replica set bootstrapping.

use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

const MONGO_IMAGE: &str = "mongo";
const MONGO_TAG: &str = "7.0";
const MONGO_PORT: u16 = 27017;

/// Uninitiated single-node replica set; cleaned up when dropped
///
/// The member host inside the container is `localhost:27017`, which is what
/// `replSetInitiate` must be given. Tests connect through the mapped port
/// with `directConnection=true`.
///
/// # Example
///
/// ```ignore
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new("rs0").await;
/// let client = mongodb::Client::with_uri_str(mongo.connection_string()).await.unwrap();
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<GenericImage>,
    pub connection_string: String,
    pub replica_set: String,
}

impl TestMongo {
    /// Start `mongod` with `--replSet <replica_set>`, without initiating it
    pub async fn new(replica_set: &str) -> Self {
        let container = GenericImage::new(MONGO_IMAGE, MONGO_TAG)
            .with_exposed_port(MONGO_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Waiting for connections"))
            .with_cmd(["--replSet", replica_set, "--bind_ip_all"])
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(MONGO_PORT)
            .await
            .expect("Failed to get MongoDB port");

        let connection_string = format!("mongodb://127.0.0.1:{}/?directConnection=true", host_port);

        tracing::info!(port = host_port, replica_set, "Test MongoDB ready ({}:{})", MONGO_IMAGE, MONGO_TAG);

        Self {
            container,
            connection_string,
            replica_set: replica_set.to_string(),
        }
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

impl Drop for TestMongo {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test MongoDB container");
    }
}
