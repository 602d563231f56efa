// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: PORT, CORS_ORIGIN, and PLANK_DB_PATH with sensible defaults

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
}

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub cors_origin: String,
    pub db_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_str = env::var("PORT").unwrap_or_else(|_| "4200".to_string());

        let port = port_str.parse::<u16>()?;
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());

        // Unset means the data-dir default from the tracker applies.
        let db_path = env::var("PLANK_DB_PATH").ok().map(PathBuf::from);

        Ok(Config {
            port,
            cors_origin,
            db_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_apply_when_env_is_empty() {
        env::remove_var("PORT");
        env::remove_var("CORS_ORIGIN");
        env::remove_var("PLANK_DB_PATH");

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 4200);
        assert_eq!(config.cors_origin, "http://localhost:5173");
        assert_eq!(config.db_path, None);
    }

    #[test]
    #[serial]
    fn port_zero_is_rejected() {
        env::set_var("PORT", "0");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::PortOutOfRange(0)));
        env::remove_var("PORT");
    }

    #[test]
    #[serial]
    fn non_numeric_port_is_rejected() {
        env::set_var("PORT", "not-a-port");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
        env::remove_var("PORT");
    }

    #[test]
    #[serial]
    fn env_overrides_are_honored() {
        env::set_var("PORT", "8080");
        env::set_var("CORS_ORIGIN", "http://localhost:3000");
        env::set_var("PLANK_DB_PATH", "/tmp/plank-test.db");

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origin, "http://localhost:3000");
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/plank-test.db")));

        env::remove_var("PORT");
        env::remove_var("CORS_ORIGIN");
        env::remove_var("PLANK_DB_PATH");
    }
}
