/// Configuration for the dashboard API client and server
use super::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level dashboard configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub limits: FetchLimits,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where and how to reach the school backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

/// Per-source result limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchLimits {
    pub records: u32,
    pub announcements: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            api_token: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            user_agent: concat!("madrasah-dashboard/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            records: 1000,
            announcements: 10,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl DashboardConfig {
    /// Loads the configuration from a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to the JSON configuration file
    ///
    /// # Returns
    /// * `Ok(DashboardConfig)` - Loaded configuration; missing fields take their defaults
    /// * `Err` - If the file can't be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self, DashboardError> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| DashboardError::Config {
            message: format!("{}: {}", path.display(), e),
        })
    }

    /// Loads `path` if it exists, otherwise starts from defaults
    pub fn load_or_default(path: &Path) -> Result<Self, DashboardError> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Applies overrides from the environment lookup `var`
    ///
    /// Recognizes `DASHBOARD_API_URL` and `DASHBOARD_API_TOKEN`.
    pub fn apply_overrides<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("DASHBOARD_API_URL") {
            self.api.base_url = url;
        }
        if let Some(token) = var("DASHBOARD_API_TOKEN").filter(|t| !t.is_empty()) {
            self.api.api_token = Some(token);
        }
        self
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.address, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let raw = r#"{
            "api": {"base_url": "https://sekolah.example/api"},
            "server": {"port": 9000}
        }"#;
        let config: DashboardConfig = serde_json::from_str(raw).unwrap();

        assert_eq!(config.api.base_url, "https://sekolah.example/api");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.limits, FetchLimits::default());
        assert_eq!(config.listen_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_env_overrides() {
        let config = DashboardConfig::default().apply_overrides(|key| match key {
            "DASHBOARD_API_URL" => Some("http://backend/api".to_string()),
            "DASHBOARD_API_TOKEN" => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.api.base_url, "http://backend/api");
        assert_eq!(config.api.api_token, None);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = Path::new("/nonexistent/dashboard.json");
        let config = DashboardConfig::load_or_default(path).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert!(DashboardConfig::load_from_file(path).is_err());
    }
}
