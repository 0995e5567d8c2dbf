//! Daemon configuration file

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use oicp_client::ClientConfig;
use oicp_core::{EvseId, EvseStatus, OperatorId, ProviderId};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which side of the protocol this daemon serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Charge point operator: receives remote commands
    #[default]
    Cpo,
    /// E-mobility provider: receives authorization requests
    Emp,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Cpo => f.write_str("cpo"),
            Role::Emp => f.write_str("emp"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub simulator: SimulatorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub role: Role,
    pub path_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 9200)),
            role: Role::Cpo,
            path_prefix: "/api/oicp".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub operator_id: String,
    pub operator_name: Option<String>,
    /// Provider reported in positive authorizations
    pub provider_id: String,
    /// Push EVSE status changes to the hub through the client
    pub push_status: bool,
    pub evses: Vec<SimulatedEvse>,
    /// RFID UIDs or contract ids accepted by the EMP simulator
    pub tokens: Vec<String>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            operator_id: "DE*ABC".to_string(),
            operator_name: None,
            provider_id: "DE*XYZ".to_string(),
            push_status: false,
            evses: Vec::new(),
            tokens: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulatedEvse {
    pub evse_id: EvseId,
    #[serde(default = "default_status")]
    pub status: EvseStatus,
}

fn default_status() -> EvseStatus {
    EvseStatus::Available
}

impl SimulatorConfig {
    pub fn operator_id(&self) -> Result<OperatorId, ConfigError> {
        OperatorId::parse(&self.operator_id).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn provider_id(&self) -> Result<ProviderId, ConfigError> {
        ProviderId::parse(&self.provider_id).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

impl DaemonConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.simulator.operator_id()?;
        self.simulator.provider_id()?;

        if !self.server.path_prefix.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "server.path_prefix must start with '/': '{}'",
                self.server.path_prefix
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for evse in &self.simulator.evses {
            if !seen.insert(&evse.evse_id) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate simulated EVSE '{}'",
                    evse.evse_id
                )));
            }
        }
        Ok(())
    }
}
