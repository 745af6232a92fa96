// Configuration module entry point
// Builds the application configuration once at startup from layered sources

mod settings;
mod state;
mod types;

use std::net::SocketAddr;

use crate::error::AppError;

// Re-export public types
pub use settings::Settings;
pub use state::AppState;
pub use types::{Config, DatabaseConfig, HttpConfig};

impl Config {
    /// Layer defaults, the TOML file at `config_path` (extension optional,
    /// may be absent), environment and settings, then validate
    pub fn load_with(config_path: &str, settings: &Settings) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("MINI_API").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_timeout", 30)?
            .set_default("http.cors_origin", "*")?
            .set_default("http.server_name", "mini-json-api/0.1")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("database.host", "")?
            .set_default("database.port", 3306)?
            .set_default("database.name", "")?
            .set_default("database.user", "")?
            .set_default("database.password", "")?
            .set_default("database.connect_timeout", 5)?
            .set_default("database.probe_on_startup", false)?;

        for (path, value) in settings.config_overrides() {
            builder = builder.set_override(path, value)?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Required database settings must be present and non-empty
    fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("DB_HOST", &self.database.host),
            ("DB_NAME", &self.database.name),
            ("DB_USER", &self.database.user),
            ("DB_PASS", &self.database.password),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::MissingSetting(key));
            }
        }
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, AppError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|e| AppError::InvalidAddress(format!("{addr} ({e})")))
    }
}
