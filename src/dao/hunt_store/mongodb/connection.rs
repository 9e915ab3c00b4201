use std::time::Duration;

use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use tokio::time::sleep;
use tracing::debug;

use super::error::{MongoDaoError, MongoResult};

const PING_ATTEMPTS: u32 = 10;
const PING_BACKOFF_START: Duration = Duration::from_millis(250);
const PING_BACKOFF_CAP: Duration = Duration::from_secs(5);

/// Build a client from the parsed options and ping the target database until
/// it answers, backing off exponentially between attempts.
pub async fn establish_connection(
    options: &ClientOptions,
    database_name: &str,
) -> MongoResult<(Client, Database)> {
    let client = Client::with_options(options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(database_name);

    let mut backoff = PING_BACKOFF_START;
    let mut attempt = 0;
    loop {
        attempt += 1;
        match database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => {
                debug!(attempt, database = database_name, "MongoDB ping answered");
                return Ok((client, database));
            }
            Err(err) if attempt >= PING_ATTEMPTS => {
                return Err(MongoDaoError::InitialPing {
                    attempts: attempt,
                    source: err,
                });
            }
            Err(_) => {
                sleep(backoff).await;
                backoff = (backoff * 2).min(PING_BACKOFF_CAP);
            }
        }
    }
}
