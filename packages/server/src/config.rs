use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::GazetteerConfig;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "JHM_CONFIG";

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default)]
    pub allow_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: Vec::new(),
            max_age: default_cors_max_age(),
        }
    }
}

fn default_cors_max_age() -> u64 {
    3600
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
}

fn default_token_ttl_days() -> i64 {
    365
}

/// Layout of the dataset workbook.
#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Sheet holding one record per row under a header row.
    #[serde(default = "default_data_sheet")]
    pub data_sheet: String,
    /// Sheet with manually entered coordinates, keyed by row identifier.
    #[serde(default = "default_location_sheet")]
    pub location_sheet: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            data_sheet: default_data_sheet(),
            location_sheet: default_location_sheet(),
        }
    }
}

fn default_data_sheet() -> String {
    "Data".into()
}

fn default_location_sheet() -> String {
    "Locations".into()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub gazetteer: GazetteerConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config/config".into());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("database.url", "sqlite://jhm.sqlite?mode=rwc")?
            // Load from config/config.toml
            .add_source(File::with_name(&path).required(false))
            // Override from environment (e.g., JHM__GAZETTEER__DATA_DIR)
            .add_source(Environment::with_prefix("JHM").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
