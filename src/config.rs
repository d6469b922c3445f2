// src/config.rs
use std::{collections::HashMap, net::SocketAddr, time::Duration};

use secrecy::SecretString;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_QUALIFIER: &str = "DEFAULT";
pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration, read from the environment (and an optional `.env`).
#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub runtime: RuntimeConfig,
}

/// Everything the dispatch shim needs to reach the agent runtime.
#[derive(Debug, Default)]
pub struct RuntimeConfig {
    /// Target runtime ARN. Absent means every dispatch fails with a
    /// configuration error.
    pub runtime_arn: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub qualifier: Option<String>,
    pub bearer_token: Option<SecretString>,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            vars.get(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("AGENT_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "AGENT_PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let timeout = match get("AGENTCORE_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.parse().map_err(|_| {
                ConfigError::Invalid { name: "AGENTCORE_TIMEOUT_SECS", value: raw }
            })?)),
            None => None,
        };

        Ok(Self {
            host: get("AGENT_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            runtime: RuntimeConfig {
                runtime_arn: get("RUNTIME_ARN"),
                region: get("AWS_REGION"),
                endpoint: get("AGENTCORE_ENDPOINT"),
                qualifier: get("AGENTCORE_QUALIFIER"),
                bearer_token: get("AGENTCORE_BEARER_TOKEN").map(SecretString::from),
                timeout,
            },
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| ConfigError::Invalid { name: "AGENT_HOST", value: raw })
    }
}

impl RuntimeConfig {
    /// Region to call: explicit setting first, then the region field of the
    /// ARN (`arn:aws:bedrock-agentcore:<region>:<account>:runtime/<id>`).
    pub fn effective_region(&self) -> String {
        self.region
            .clone()
            .or_else(|| self.runtime_arn.as_deref().and_then(region_from_arn))
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
    }

    pub fn effective_endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://bedrock-agentcore.{}.amazonaws.com", self.effective_region()),
        }
    }

    pub fn effective_qualifier(&self) -> &str {
        self.qualifier.as_deref().unwrap_or(DEFAULT_QUALIFIER)
    }
}

pub fn region_from_arn(arn: &str) -> Option<String> {
    let mut parts = arn.split(':');
    if parts.next()? != "arn" {
        return None;
    }
    let region = parts.nth(2)?;
    (!region.is_empty()).then(|| region.to_string())
}
