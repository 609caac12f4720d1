//! Provider registry for managing enabled search providers

use super::traits::SearchProvider;
use crate::config::ProviderConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Registry of all configured search providers
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn SearchProvider>>,
    configs: HashMap<String, ProviderConfig>,
    default_timeout: Duration,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            configs: HashMap::new(),
            default_timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT),
        }
    }

    /// Fallback timeout for providers without their own
    pub fn set_default_timeout(&mut self, timeout: Duration) {
        self.default_timeout = timeout;
    }

    /// Register a provider with its configuration
    pub fn register(&mut self, provider: Arc<dyn SearchProvider>, config: ProviderConfig) {
        let name = provider.name().to_string();
        self.providers.insert(name.clone(), provider);
        self.configs.insert(name, config);
    }

    /// Register a provider with default configuration
    pub fn register_default(&mut self, provider: Arc<dyn SearchProvider>) {
        let config = ProviderConfig {
            name: provider.name().to_string(),
            ..Default::default()
        };
        self.register(provider, config);
    }

    /// Get a provider by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn SearchProvider>> {
        self.providers.get(name)
    }

    /// Get provider config
    pub fn get_config(&self, name: &str) -> Option<&ProviderConfig> {
        self.configs.get(name)
    }

    /// All enabled providers sorted by ascending priority
    pub fn enabled(&self) -> Vec<Arc<dyn SearchProvider>> {
        let mut providers: Vec<Arc<dyn SearchProvider>> = self
            .configs
            .iter()
            .filter(|(_, config)| !config.disabled)
            .filter_map(|(name, _)| self.providers.get(name).cloned())
            .collect();
        providers.sort_by_key(|p| self.get_priority(p.name()));
        providers
    }

    /// Enabled providers restricted to an explicit subset, priority order
    /// preserved. Unknown and disabled names are skipped.
    pub fn enabled_subset(&self, names: &[String]) -> Vec<Arc<dyn SearchProvider>> {
        self.enabled()
            .into_iter()
            .filter(|p| names.iter().any(|n| n == p.name()))
            .collect()
    }

    /// Effective timeout for a provider (config override wins).
    /// Non-finite or non-positive overrides from settings are ignored.
    pub fn get_timeout(&self, name: &str) -> Duration {
        self.configs
            .get(name)
            .and_then(|c| c.timeout_secs)
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(Duration::from_secs_f64)
            .or_else(|| self.providers.get(name).map(|p| p.timeout()))
            .unwrap_or(self.default_timeout)
    }

    /// Effective priority for a provider (config override wins)
    pub fn get_priority(&self, name: &str) -> u32 {
        self.configs
            .get(name)
            .and_then(|c| c.priority)
            .or_else(|| self.providers.get(name).map(|p| p.priority()))
            .unwrap_or(u32::MAX)
    }

    /// All registered provider names
    pub fn names(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testutil::StaticProvider;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ProviderRegistry::new();
        registry.register_default(Arc::new(StaticProvider::empty("pubmed", 1)));

        assert!(registry.contains("pubmed"));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("pubmed").is_some());
    }

    #[test]
    fn test_enabled_sorted_by_priority() {
        let mut registry = ProviderRegistry::new();
        registry.register_default(Arc::new(StaticProvider::empty("slow", 3)));
        registry.register_default(Arc::new(StaticProvider::empty("fast", 1)));
        registry.register_default(Arc::new(StaticProvider::empty("mid", 2)));

        let names: Vec<String> = registry
            .enabled()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["fast", "mid", "slow"]);
    }

    #[test]
    fn test_disabled_provider_excluded() {
        let mut registry = ProviderRegistry::new();
        registry.register(
            Arc::new(StaticProvider::empty("pubmed", 1)),
            ProviderConfig {
                name: "pubmed".to_string(),
                disabled: true,
                ..Default::default()
            },
        );

        assert!(registry.enabled().is_empty());
    }

    #[test]
    fn test_subset_keeps_priority_order() {
        let mut registry = ProviderRegistry::new();
        registry.register_default(Arc::new(StaticProvider::empty("a", 2)));
        registry.register_default(Arc::new(StaticProvider::empty("b", 1)));
        registry.register_default(Arc::new(StaticProvider::empty("c", 3)));

        let subset =
            registry.enabled_subset(&["c".to_string(), "b".to_string(), "nope".to_string()]);
        let names: Vec<String> = subset.iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_invalid_timeout_override_ignored() {
        for bad in [-5.0, 0.0, f64::NAN, f64::INFINITY] {
            let mut registry = ProviderRegistry::new();
            registry.register(
                Arc::new(StaticProvider::empty("pubmed", 1)),
                ProviderConfig {
                    name: "pubmed".to_string(),
                    timeout_secs: Some(bad),
                    ..Default::default()
                },
            );

            // Falls back to the adapter's own timeout instead of panicking
            assert_eq!(registry.get_timeout("pubmed"), Duration::from_secs(10));
        }
    }

    #[test]
    fn test_config_timeout_override() {
        let mut registry = ProviderRegistry::new();
        registry.register(
            Arc::new(StaticProvider::empty("pubmed", 1)),
            ProviderConfig {
                name: "pubmed".to_string(),
                timeout_secs: Some(20.0),
                ..Default::default()
            },
        );

        assert_eq!(registry.get_timeout("pubmed"), Duration::from_secs(20));
    }
}
