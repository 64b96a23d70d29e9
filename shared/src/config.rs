//! Configuration management for the assistant Lambda.

use std::env;

use crate::{Error, Result};

/// Default number of recent reports returned by the window query.
pub const DEFAULT_RECENT_REPORTS_LIMIT: i64 = 20;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database host
    pub db_host: String,
    /// Database name
    pub db_name: String,
    /// ARN of the secret containing database credentials
    pub db_secret_arn: String,
    /// AWS region
    pub aws_region: String,
    /// Size of the recent-report window served to clients
    pub recent_reports_limit: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            db_host: required("DATABASE_HOST")?,
            db_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "civic_fix".to_string()),
            db_secret_arn: required("DATABASE_URL_SECRET_ARN")?,
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            recent_reports_limit: parse_limit(env::var("RECENT_REPORTS_LIMIT").ok().as_deref())?,
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).map_err(|_| Error::Config(format!("{} not set", key)))
}

fn parse_limit(raw: Option<&str>) -> Result<i64> {
    match raw {
        None => Ok(DEFAULT_RECENT_REPORTS_LIMIT),
        Some(value) => match value.trim().parse::<i64>() {
            Ok(limit) if limit > 0 => Ok(limit),
            _ => Err(Error::Config(format!(
                "RECENT_REPORTS_LIMIT must be a positive integer, got {:?}",
                value
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_defaults_when_unset() {
        assert_eq!(parse_limit(None).unwrap(), DEFAULT_RECENT_REPORTS_LIMIT);
    }

    #[test]
    fn test_limit_rejects_garbage() {
        assert_eq!(parse_limit(Some(" 50 ")).unwrap(), 50);
        assert!(matches!(parse_limit(Some("0")), Err(Error::Config(_))));
        assert!(matches!(parse_limit(Some("many")), Err(Error::Config(_))));
    }
}
