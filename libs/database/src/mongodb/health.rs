use mongodb::{Client, bson::doc};

/// Ping the `admin` database. Returns `Err` with the driver message on failure.
///
/// Shaped to plug into `axum_helpers::run_health_checks`.
pub async fn ping(client: &Client) -> Result<(), String> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
}
