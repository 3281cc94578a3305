// ABOUTME: Server configuration loaded from the environment
// ABOUTME: Port, bind address, database location and CORS origin with validation

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use larder_config::{
    DEFAULT_API_HOST, DEFAULT_API_PORT, DEFAULT_CORS_ORIGIN, LARDER_API_HOST, LARDER_API_PORT,
    LARDER_CORS_ORIGIN, LARDER_DATABASE_PATH, PORT,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_path: PathBuf,
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // LARDER_API_PORT wins over the legacy PORT
        let port_str = env::var(LARDER_API_PORT)
            .or_else(|_| env::var(PORT))
            .unwrap_or_else(|_| DEFAULT_API_PORT.to_string());
        let port = parse_port(&port_str)?;

        let host_str = env::var(LARDER_API_HOST).unwrap_or_else(|_| DEFAULT_API_HOST.to_string());
        let host = parse_host(&host_str)?;

        let database_path = env::var(LARDER_DATABASE_PATH)
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(larder_core::database_file);

        let cors_origin =
            env::var(LARDER_CORS_ORIGIN).unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

        Ok(Config {
            host,
            port,
            database_path,
            cors_origin,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

pub fn parse_port(value: &str) -> Result<u16, ConfigError> {
    let port = value.trim().parse::<u16>()?;
    if port == 0 {
        return Err(ConfigError::PortOutOfRange(port));
    }
    Ok(port)
}

pub fn parse_host(value: &str) -> Result<IpAddr, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidHost(value.to_string()))
}
