//! Settings structures for MedSearch-RS configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub cache: CacheSettings,
    pub providers: Vec<ProviderConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            search: SearchSettings::default(),
            cache: CacheSettings::default(),
            providers: default_providers(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (MEDSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("MEDSEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("MEDSEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("MEDSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("MEDSEARCH_CACHE_CAPACITY") {
            if let Ok(capacity) = val.parse() {
                self.cache.capacity = capacity;
            }
        }
    }

    /// Get provider config by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// Get all enabled provider configs
    pub fn enabled_providers(&self) -> Vec<&ProviderConfig> {
        self.providers.iter().filter(|p| !p.disabled).collect()
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug mode
    pub debug: bool,
    /// Instance name reported by /health
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "MedSearch".to_string(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Results a sequential pass needs before stopping early
    pub min_sequential_results: usize,
    /// Fallback per-provider timeout in seconds
    pub default_timeout_secs: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_sequential_results: 5,
            default_timeout_secs: 10.0,
        }
    }
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum number of cached orchestration results
    pub capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { capacity: 1000 }
    }
}

/// Per-provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name, must match the registered adapter
    pub name: String,
    /// Exclude this provider from all requests
    pub disabled: bool,
    /// Per-call timeout override in seconds
    pub timeout_secs: Option<f64>,
    /// Priority override; lower is invoked/preferred first
    pub priority: Option<u32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            disabled: false,
            timeout_secs: None,
            priority: None,
        }
    }
}

/// Provider table used when no settings file is present
fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            name: "pubmed".to_string(),
            timeout_secs: Some(10.0),
            priority: Some(1),
            ..Default::default()
        },
        ProviderConfig {
            name: "clinicaltrials".to_string(),
            timeout_secs: Some(15.0),
            priority: Some(2),
            ..Default::default()
        },
        ProviderConfig {
            name: "openevidence".to_string(),
            timeout_secs: Some(20.0),
            priority: Some(3),
            ..Default::default()
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.cache.capacity, 1000);
        assert_eq!(settings.providers.len(), 3);
        assert_eq!(settings.enabled_providers().len(), 3);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let yaml = r#"
server:
  port: 9090
providers:
  - name: pubmed
    timeout_secs: 5.0
    priority: 1
  - name: clinicaltrials
    disabled: true
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.providers.len(), 2);
        assert_eq!(settings.enabled_providers().len(), 1);
        assert_eq!(
            settings.get_provider("pubmed").unwrap().timeout_secs,
            Some(5.0)
        );
    }
}
