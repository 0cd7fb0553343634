use std::{env, net::SocketAddr};

use axum::http::HeaderValue;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Http,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub transport: Transport,
    pub bind_addr: String,
    pub bind_port: u16,
    pub auth_enabled: bool,
    pub api_tokens: Vec<String>,
    pub allowed_origins: Vec<HeaderValue>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENWEATHER_API_KEY is required and must not be empty")]
    MissingApiKey,
    #[error("MCP_TRANSPORT must be 'stdio' or 'http'")]
    InvalidTransport,
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("MCP_AUTH_ENABLED must be 'true' or 'false'")]
    InvalidAuthToggle,
    #[error("MCP_ALLOWED_ORIGINS contains an invalid origin")]
    InvalidOrigin,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("OPENWEATHER_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let transport = env::var("MCP_TRANSPORT")
            .ok()
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty())
            .map(|value| match value.as_str() {
                "stdio" => Ok(Transport::Stdio),
                "http" => Ok(Transport::Http),
                _ => Err(ConfigError::InvalidTransport),
            })
            .transpose()?
            .unwrap_or(Transport::Stdio);

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
        let bind_port = env::var("BIND_PORT")
            .ok()
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);

        let auth_enabled = env::var("MCP_AUTH_ENABLED")
            .ok()
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty())
            .map(|value| match value.as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(ConfigError::InvalidAuthToggle),
            })
            .transpose()?
            .unwrap_or(true);

        let api_tokens = env::var("MCP_API_TOKENS")
            .ok()
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let allowed_origins = env::var("MCP_ALLOWED_ORIGINS")
            .ok()
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(|origin| {
                        origin
                            .parse::<HeaderValue>()
                            .map_err(|_| ConfigError::InvalidOrigin)
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();

        let config = Self {
            api_key,
            transport,
            bind_addr,
            bind_port,
            auth_enabled,
            api_tokens,
            allowed_origins,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}
