//! Application state shared across handlers

use crate::config::Settings;
use crate::providers::ProviderRegistry;
use crate::search::Orchestrator;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Provider registry
    pub registry: Arc<ProviderRegistry>,
    /// Search orchestrator
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        registry: Arc<ProviderRegistry>,
        orchestrator: Orchestrator,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            registry,
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
