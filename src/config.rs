use std::env;
use std::path::PathBuf;

use crate::error::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOCATION_IQ_BASE_URL: &str = "https://us1.locationiq.com";
const DEFAULT_UPLOAD_DIR: &str = "uploads/images";

/// Process-wide settings, read once at startup and handed to the components
/// that need them.
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub jwt_key: String,
    pub location_iq_api_key: String,
    pub location_iq_base_url: String,
    pub upload_dir: PathBuf,
}

impl Config {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| {
                tracing::error!("missing required setting {}", key);
                Error::internal(format!("missing required setting {}", key))
            })
        };

        let port = match lookup("PORT") {
            Some(value) => parse_number(&value, "PORT")?,
            None => DEFAULT_PORT,
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => parse_number(&value, "DATABASE_MAX_CONNECTIONS")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            port,
            database_url: required("DATABASE_URL")?,
            max_connections,
            jwt_key: required("JWT_KEY")?,
            location_iq_api_key: required("LOCATIONIQ_API_KEY")?,
            location_iq_base_url: lookup("LOCATIONIQ_API_BASE")
                .unwrap_or_else(|| DEFAULT_LOCATION_IQ_BASE_URL.into()),
            upload_dir: lookup("UPLOAD_DIR")
                .unwrap_or_else(|| DEFAULT_UPLOAD_DIR.into())
                .into(),
        })
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, Error> {
    value.trim().parse().map_err(|_| {
        tracing::error!("setting {} is not a valid number: {:?}", key, value);
        Error::internal(format!("invalid setting {}", key))
    })
}
