//! Database connection probe
//!
//! The HTTP routes never touch the database. This only verifies at startup
//! (or on `--check-db`) that the configured MySQL server accepts the
//! credentials from the settings file.

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::logger;

pub fn connect_options(db: &DatabaseConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&db.host)
        .port(db.port)
        .database(&db.name)
        .username(&db.user)
        .password(&db.password)
        .charset("utf8mb4")
}

/// Open a single connection, run `SELECT 1`, close it
pub async fn probe(db: &DatabaseConfig) -> Result<(), AppError> {
    logger::log_info(&format!(
        "Probing database {}@{}:{}/{}",
        db.user, db.host, db.port, db.name
    ));

    let pool = MySqlPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(db.connect_timeout))
        .connect_with(connect_options(db))
        .await?;

    let result = sqlx::query("SELECT 1").execute(&pool).await;
    pool.close().await;
    result?;

    logger::log_info("Database connection OK");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(port: u16) -> DatabaseConfig {
        DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port,
            name: "app".to_string(),
            user: "api".to_string(),
            password: "secret".to_string(),
            connect_timeout: 1,
            probe_on_startup: false,
        }
    }

    #[test]
    fn test_connect_options() {
        let options = connect_options(&config(3307));
        assert_eq!(options.get_host(), "127.0.0.1");
        assert_eq!(options.get_port(), 3307);
        assert_eq!(options.get_database(), Some("app"));
        assert_eq!(options.get_username(), "api");
        assert_eq!(options.get_charset(), "utf8mb4");
    }

    #[tokio::test]
    async fn test_probe_fails_without_server() {
        // Bind then drop to get a port with nothing listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err = probe(&config(port)).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
