use std::fmt::{Debug, Formatter};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Location of the optional settings file, relative to the working directory.
const SETTINGS_FILE: &str = "config/settings";

/// Configuration options of the inventory service.
///
/// Values come from `config/settings.yaml` (optional) overlaid with
/// environment variables such as `DB_HOST` or `SERVER_PORT`.
#[derive(Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_db_host")]
    pub db_host: String,
    #[serde(default = "default_db_port")]
    pub db_port: u16,
    #[serde(default = "default_db_user")]
    pub db_user: String,
    #[serde(default)]
    pub db_password: String,
    #[serde(default = "default_db_name")]
    pub db_name: String,
    #[serde(default = "default_db_sslmode")]
    pub db_sslmode: String,
    #[serde(default = "default_server_address")]
    pub server_address: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    #[serde(default = "default_db_pool_size")]
    pub db_pool_size: u32,
    /// Maximum wait for a pooled connection.
    #[serde(default = "default_db_connection_timeout_ms")]
    pub db_connection_timeout_ms: u64,
    /// Maximum wait for a product row lock inside the ledger transaction.
    #[serde(default = "default_db_lock_timeout_ms")]
    pub db_lock_timeout_ms: u64,
    /// Upper bound for any single statement inside the ledger transaction.
    #[serde(default = "default_db_statement_timeout_ms")]
    pub db_statement_timeout_ms: u64,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_name() -> String {
    "inventario_db".to_string()
}

fn default_db_sslmode() -> String {
    "disable".to_string()
}

fn default_server_address() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_db_pool_size() -> u32 {
    10
}

fn default_db_connection_timeout_ms() -> u64 {
    5_000
}

fn default_db_lock_timeout_ms() -> u64 {
    5_000
}

fn default_db_statement_timeout_ms() -> u64 {
    15_000
}

/// Quote a libpq keyword/value: wrap in `'` and backslash-escape `\` and `'`.
fn quote_conninfo(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

impl ServerConfig {
    /// Load the configuration from the settings file and the environment.
    ///
    /// Fails when `DB_PASSWORD` is missing or empty.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(SETTINGS_FILE).required(false))
            .add_source(Environment::default())
            .build()?;

        Self::from_config(settings)
    }

    /// Deserialize and validate an already assembled [`Config`].
    pub fn from_config(settings: Config) -> Result<Self, ConfigError> {
        let config: ServerConfig = settings.try_deserialize()?;

        if config.db_password.trim().is_empty() {
            return Err(ConfigError::Message(
                "DB_PASSWORD is not set; configure it in the environment or .env file".to_string(),
            ));
        }

        Ok(config)
    }

    /// libpq-style connection string for the configured database.
    ///
    /// Every value is single-quoted so passwords may contain spaces or quotes.
    pub fn database_url(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode={}",
            quote_conninfo(&self.db_host),
            self.db_port,
            quote_conninfo(&self.db_user),
            quote_conninfo(&self.db_password),
            quote_conninfo(&self.db_name),
            quote_conninfo(&self.db_sslmode)
        )
    }

    /// `address:port` the HTTP server binds to.
    pub fn bind_address(&self) -> (String, u16) {
        (self.server_address.clone(), self.server_port)
    }
}

impl Debug for ServerConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_user", &self.db_user)
            .field("db_password", &"<redacted>")
            .field("db_name", &self.db_name)
            .field("db_sslmode", &self.db_sslmode)
            .field("server_address", &self.server_address)
            .field("server_port", &self.server_port)
            .field("db_pool_size", &self.db_pool_size)
            .field("db_connection_timeout_ms", &self.db_connection_timeout_ms)
            .field("db_lock_timeout_ms", &self.db_lock_timeout_ms)
            .field("db_statement_timeout_ms", &self.db_statement_timeout_ms)
            .finish()
    }
}
