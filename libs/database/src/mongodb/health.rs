use mongodb::{Client, bson::doc};
use std::time::{Duration, Instant};

/// Run `ping` against the `admin` database and return the round-trip time.
///
/// `ping` succeeds on any node state, including a replica set member that has
/// not been initiated yet, which makes it the right liveness probe before
/// `replSetInitiate`. Commands like `listDatabases` are refused there.
pub async fn ping(client: &Client) -> Result<Duration, mongodb::error::Error> {
    let start = Instant::now();
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;
    Ok(start.elapsed())
}
