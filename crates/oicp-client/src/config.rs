//! Client configuration

use std::time::Duration;

use serde::Deserialize;

/// Connection settings of an OICP client
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Default per-call timeout
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub endpoints: Endpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9200".to_string(),
            timeout_secs: 60,
            connect_timeout_secs: 10,
            endpoints: Endpoints::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Path of each OICP service, relative to the base URL
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Authorize start/stop, remote start/stop and charge detail records
    pub authorization: String,
    pub reservation: String,
    pub evse_data: String,
    pub evse_status: String,
    pub evse_search: String,
    pub authentication_data: String,
}

impl Endpoints {
    /// Every endpoint below `prefix`
    pub fn with_prefix(prefix: &str) -> Self {
        let prefix = prefix.trim_end_matches('/');
        Self {
            authorization: format!("{}/Authorization", prefix),
            reservation: format!("{}/Reservation", prefix),
            evse_data: format!("{}/EVSEData", prefix),
            evse_status: format!("{}/EVSEStatus", prefix),
            evse_search: format!("{}/EVSESearch", prefix),
            authentication_data: format!("{}/AuthenticationData", prefix),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::with_prefix("/api/oicp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            base_url = "https://service-qa.hubject.com"
            timeout_secs = 5

            [endpoints]
            authorization = "/api/oicp/charging/v20/authorization"
            "#,
        )
        .unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(
            config.endpoints.authorization,
            "/api/oicp/charging/v20/authorization"
        );
        assert_eq!(config.endpoints.evse_status, "/api/oicp/EVSEStatus");
    }

    #[test]
    fn test_prefix_trailing_slash() {
        assert_eq!(Endpoints::with_prefix("/oicp/"), Endpoints::with_prefix("/oicp"));
        assert_eq!(Endpoints::with_prefix("").authorization, "/Authorization");
    }
}
