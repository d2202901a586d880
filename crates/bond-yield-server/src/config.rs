//! Server configuration.

use std::net::{IpAddr, SocketAddr};

use bond_yield_core::SolverConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`ServerConfig`].
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// `PORT` is set but is not a port number.
    #[error("Invalid PORT value: {0:?}")]
    InvalidPort(String),

    /// `host` is not an IP address.
    #[error("Invalid host {0:?}: expected an IP address such as 0.0.0.0")]
    InvalidHost(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origin; any origin when unset
    pub cors_origin: Option<String>,

    /// YTM solver settings
    #[serde(default)]
    pub solver: SolverConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: None,
            solver: SolverConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Address to bind, from `host` and `port`.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Apply `PORT` and `FRONTEND_ORIGIN` from the environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(
            std::env::var("PORT").ok(),
            std::env::var("FRONTEND_ORIGIN").ok(),
        )
    }

    /// Override port and CORS origin when values are given.
    pub fn with_overrides(
        mut self,
        port: Option<String>,
        cors_origin: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(port) = port {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Some(origin) = cors_origin.filter(|o| !o.is_empty()) {
            self.cors_origin = Some(origin);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert!(config.cors_origin.is_none());
        assert_eq!(config.solver, SolverConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            port = 8081

            [solver]
            max_iterations = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8081);
        assert_eq!(config.solver.max_iterations, 250);
        assert_eq!(
            config.solver.initial_annual_guess,
            SolverConfig::default().initial_annual_guess
        );
    }

    #[test]
    fn test_solver_decimal_from_toml_float() {
        let config: ServerConfig = toml::from_str(
            r#"
            [solver]
            initial_annual_guess = 0.08
            "#,
        )
        .unwrap();
        assert!((config.solver.initial_annual_guess - dec!(0.08)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_env_overrides() {
        let config = ServerConfig::default()
            .with_overrides(
                Some("4000".to_string()),
                Some("http://localhost:5173".to_string()),
            )
            .unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:5173"));
    }

    #[test]
    fn test_unset_overrides_leave_config() {
        let config = ServerConfig::default()
            .with_overrides(None, Some(String::new()))
            .unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn test_socket_addr_from_host_and_port() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8081,
            ..ServerConfig::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8081");
    }

    #[test]
    fn test_invalid_host_rejected() {
        let config = ServerConfig {
            host: "not-a-host".to_string(),
            ..ServerConfig::default()
        };
        let err = config.socket_addr().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHost(ref h) if h == "not-a-host"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = ServerConfig::default()
            .with_overrides(Some("http".to_string()), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }
}
