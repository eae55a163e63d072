use std::{env, str::FromStr};

use thiserror::Error;

use crate::policy::OwnerMode;

/// Upper bound for `ACCESS_TOKEN_TTL_MINUTES`: one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Runtime settings, read from the process environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
    /// `None` returns list endpoints unpaginated.
    pub page_size: Option<u32>,
    pub owner_mode: OwnerMode,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::from_filename(".env").or_else(|_| dotenv::dotenv()).ok();

        let page_size = match optional::<u32>("PAGE_SIZE")? {
            Some(0) | None => None,
            Some(n) => Some(n),
        };
        let owner_mode = if parse_flag("REQUIRE_SNIPPET_OWNER", true)? {
            OwnerMode::Required
        } else {
            OwnerMode::Optional
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://snippets.db?mode=rwc".to_owned()),
            db_max_connections: optional("DB_MAX_CONNECTIONS")?.unwrap_or(5),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_owned()),
            port: optional("PORT")?.unwrap_or(8000),
            jwt_secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?,
            access_token_ttl_minutes: token_ttl("ACCESS_TOKEN_TTL_MINUTES")?,
            bcrypt_cost: optional("BCRYPT_COST")?.unwrap_or(bcrypt::DEFAULT_COST),
            page_size,
            owner_mode,
        })
    }
}

fn optional<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(None),
    }
}

/// Minutes between 1 and [`MAX_TOKEN_TTL_MINUTES`], 60 when unset.
fn token_ttl(var: &'static str) -> Result<i64, ConfigError> {
    match optional::<i64>(var)? {
        None => Ok(60),
        Some(minutes) if (1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes) => Ok(minutes),
        Some(minutes) => Err(ConfigError::Invalid {
            var,
            value: minutes.to_string(),
        }),
    }
}

fn parse_flag(var: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(value) = env::var(var) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { var, value }),
    }
}
