//! Database connection management.

use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::Deserialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::{Config, Error, Result};

/// Database credentials from Secrets Manager.
#[derive(Debug, Deserialize)]
pub struct DatabaseCredentials {
    #[serde(default = "default_username")]
    pub username: String,
    pub password: String,
    pub port: Option<u16>,
}

fn default_username() -> String {
    "civicadmin".to_string()
}

/// Fetch database credentials from Secrets Manager.
pub async fn get_database_credentials(
    client: &SecretsClient,
    secret_arn: &str,
) -> Result<DatabaseCredentials> {
    let response = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Aws(format!("Failed to get secret: {}", e)))?;

    let secret_string = response
        .secret_string()
        .ok_or_else(|| Error::Aws("Secret has no string value".to_string()))?;

    parse_credentials(secret_string)
}

fn parse_credentials(secret: &str) -> Result<DatabaseCredentials> {
    serde_json::from_str(secret)
        .map_err(|e| Error::Aws(format!("Failed to parse database credentials: {}", e)))
}

fn database_url(config: &Config, creds: &DatabaseCredentials) -> String {
    format!(
        "postgres://{}:{}@{}:{}/{}",
        creds.username,
        creds.password,
        config.db_host,
        creds.port.unwrap_or(5432),
        config.db_name
    )
}

/// Create a database connection pool.
pub async fn create_pool(config: &Config, creds: &DatabaseCredentials) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&database_url(config, creds))
        .await
        .map_err(Error::Database)?;

    Ok(pool)
}

/// Resolve credentials and open the pool in one step.
pub async fn connect(config: &Config) -> Result<PgPool> {
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;
    let secrets_client = SecretsClient::new(&aws_config);

    let creds = get_database_credentials(&secrets_client, &config.db_secret_arn).await?;
    create_pool(config, &creds).await
}
