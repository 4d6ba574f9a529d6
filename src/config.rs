use std::env;

use crate::error::{RaceResultsError, Result};

pub const DEFAULT_WORLD_ID: u32 = 1;

/// Settings read from the Lambda environment at cold start.
///
/// Passwords are still KMS ciphertext here; see [`crate::credentials::resolve_secret`].
#[derive(Debug, Clone)]
pub struct Config {
    pub zwift_user: String,
    pub zwift_password_encrypted: Option<String>,
    pub zwift_world_id: u32,
    pub db_host: String,
    pub db_user: String,
    pub db_name: String,
    pub db_password_encrypted: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup so tests need not touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| RaceResultsError::Configuration(format!("{} must be set", key)))
        };

        let zwift_world_id = match lookup("ZWIFT_WORLD_ID").filter(|v| !v.is_empty()) {
            Some(raw) => raw.parse::<u32>().map_err(|e| {
                RaceResultsError::Configuration(format!("ZWIFT_WORLD_ID is not a number: {}", e))
            })?,
            None => DEFAULT_WORLD_ID,
        };

        Ok(Config {
            zwift_user: required("ZWIFTUSER")?,
            zwift_password_encrypted: lookup("ZWIFTPW"),
            zwift_world_id,
            db_host: required("DBHOST")?,
            db_user: required("DBUSER")?,
            db_name: required("DBNAME")?,
            db_password_encrypted: lookup("DBPW"),
        })
    }
}
