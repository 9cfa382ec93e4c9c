//! Centralized configuration (environment variables + defaults).
//!
//! Everything is read once at startup. An optional `.env` file is loaded first.

use sqlx::postgres::PgConnectOptions;
use std::net::SocketAddr;

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_NAME: &str = "car_management";
const DEFAULT_CAR_TABLE: &str = "cars";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Postgres identifiers longer than this are silently truncated by the server.
const MAX_IDENT_LEN: usize = 63;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{key} must be a plain SQL identifier, got '{value}'")]
    InvalidIdentifier { key: &'static str, value: String },
}

/// Connection parameters plus the database/table the application manages.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub table: String,
    pub max_connections: u32,
}

impl DatabaseSettings {
    /// Options for the target database.
    pub fn connect_options(&self) -> PgConnectOptions {
        self.server_options().database(&self.database)
    }

    /// Options for the server's maintenance database, used before the target exists.
    pub fn maintenance_options(&self) -> PgConnectOptions {
        self.server_options().database("postgres")
    }

    fn server_options(&self) -> PgConnectOptions {
        let opts = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user);
        if self.password.is_empty() {
            opts
        } else {
            opts.password(&self.password)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub bind_addr: SocketAddr,
}

impl Settings {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("DB_PORT") {
            Some(v) => parse_value("DB_PORT", &v)?,
            None => DEFAULT_DB_PORT,
        };
        let max_connections: u32 = match get("DB_MAX_CONNECTIONS") {
            Some(v) => parse_value("DB_MAX_CONNECTIONS", &v)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = parse_value("BIND_ADDR", &bind_raw)?;

        let database = get("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
        if !is_valid_ident(&database) {
            return Err(ConfigError::InvalidIdentifier {
                key: "DB_NAME",
                value: database,
            });
        }
        let table = get("CAR_TABLE").unwrap_or_else(|| DEFAULT_CAR_TABLE.to_string());
        if !is_valid_ident(&table) {
            return Err(ConfigError::InvalidIdentifier {
                key: "CAR_TABLE",
                value: table,
            });
        }

        Ok(Self {
            database: DatabaseSettings {
                host: get("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
                port,
                user: get("DB_USER").unwrap_or_else(|| DEFAULT_DB_USER.to_string()),
                // A password may legitimately be whitespace, so read it raw.
                password: lookup("DB_PASS").unwrap_or_default(),
                database,
                table,
                max_connections: max_connections.max(1),
            },
            bind_addr,
        })
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// True for names that can be interpolated into SQL without quoting concerns.
pub fn is_valid_ident(ident: &str) -> bool {
    if ident.len() > MAX_IDENT_LEN {
        return false;
    }
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
