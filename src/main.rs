//! MedSearch-RS: a multi-provider medical search orchestrator
//!
//! This is the main entry point for the application.

use anyhow::Result;
use medsearch_rs::{
    cache::MemoryCache,
    config::Settings,
    enhance::KeywordClassifier,
    providers::ProviderRegistry,
    search::Orchestrator,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Starting MedSearch-RS v{}", medsearch_rs::VERSION);

    // Load configuration
    let settings = load_settings()?;
    info!(
        "Loaded configuration for instance: {}",
        settings.general.instance_name
    );

    // Build the provider registry. Adapters are registered by the
    // embedding deployment; configs without an adapter are skipped.
    let registry = Arc::new(build_registry(&settings));
    if registry.is_empty() {
        warn!("No provider adapters registered; searches will be rejected");
    } else {
        info!("Registered {} search providers", registry.len());
    }

    let cache = Arc::new(MemoryCache::new(settings.cache.capacity));
    let orchestrator = Orchestrator::new(registry.clone(), cache)
        .with_min_sequential_results(settings.search.min_sequential_results)
        .with_classifier(Arc::new(KeywordClassifier));

    let state = AppState::new(settings.clone(), registry, orchestrator);
    let app = create_router(state);

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build a registry from configured providers.
///
/// The binary ships no adapters of its own: each configured name must be
/// matched with an adapter by the embedding application (this is where a
/// deployment would wire its PubMed/ClinicalTrials/answer-API clients).
fn build_registry(settings: &Settings) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    let default_secs = settings.search.default_timeout_secs;
    if default_secs.is_finite() && default_secs > 0.0 {
        registry.set_default_timeout(std::time::Duration::from_secs_f64(default_secs));
    } else {
        warn!("Ignoring invalid default_timeout_secs: {}", default_secs);
    }
    for config in settings.enabled_providers() {
        warn!(
            "Provider '{}' configured but no adapter is registered",
            config.name
        );
    }
    registry
}

/// Load settings from file or use defaults
fn load_settings() -> Result<Settings> {
    // Check for settings file in various locations
    let paths = [
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/medsearch/settings.yml"),
        dirs::config_dir()
            .map(|p| p.join("medsearch-rs/settings.yml"))
            .unwrap_or_default(),
    ];

    // Check environment variable first
    if let Ok(path) = std::env::var("MEDSEARCH_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    // Try each default path
    for path in paths.iter() {
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    // Use defaults
    info!("No settings file found, using defaults");
    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}
