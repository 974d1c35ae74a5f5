//! Test configuration builder for E2E tests.

use glassbox_core::config::{GlassboxConfig, ProviderConfig};

/// Builder for test-friendly `GlassboxConfig` instances.
///
/// By default no providers are configured, the PID file is disabled,
/// and timeouts use safe test defaults.
pub struct TestConfigBuilder {
    config: GlassboxConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        let mut config = GlassboxConfig::default();
        config.general.pid_file = String::new();
        Self { config }
    }

    /// Add an enabled provider entry.
    pub fn provider(mut self, name: &str) -> Self {
        self.config.providers.push(ProviderConfig {
            name: name.to_owned(),
            enabled: true,
            ..ProviderConfig::default()
        });
        self
    }

    /// Add a disabled provider entry.
    #[allow(dead_code)]
    pub fn disabled_provider(mut self, name: &str) -> Self {
        self.config.providers.push(ProviderConfig {
            name: name.to_owned(),
            enabled: false,
            ..ProviderConfig::default()
        });
        self
    }

    pub fn build(self) -> GlassboxConfig {
        self.config
    }
}
