//! Mock provider plugins for E2E tests.

use glassbox_core::config::ProviderConfig;
use glassbox_core::error::{GlassboxError, PluginError};
use glassbox_core::model::RawData;
use glassbox_core::plugin::Plugin;

/// A mock plugin that serves a canned snapshot or fails on demand.
pub struct MockPlugin {
    name: String,
    raw: RawData,
    fail_init: bool,
    fail_fetch: bool,
}

impl MockPlugin {
    /// A plugin that returns `raw` from every fetch.
    pub fn with_data(name: &str, raw: RawData) -> Self {
        Self {
            name: name.to_owned(),
            raw,
            fail_init: false,
            fail_fetch: false,
        }
    }

    /// A plugin whose `fetch_data` always fails.
    pub fn failing_fetch(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            raw: RawData::new(),
            fail_init: false,
            fail_fetch: true,
        }
    }

    /// A plugin whose `initialize` always fails.
    #[allow(dead_code)]
    pub fn failing_init(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            raw: RawData::new(),
            fail_init: true,
            fail_fetch: false,
        }
    }
}

impl Plugin for MockPlugin {
    async fn initialize(&mut self, _config: &ProviderConfig) -> Result<(), GlassboxError> {
        if self.fail_init {
            return Err(PluginError::InitFailed {
                name: self.name.clone(),
                reason: "injected init failure".to_owned(),
            }
            .into());
        }
        Ok(())
    }

    async fn fetch_data(&self) -> Result<RawData, GlassboxError> {
        if self.fail_fetch {
            return Err(PluginError::FetchFailed {
                name: self.name.clone(),
                reason: "injected fetch failure".to_owned(),
            }
            .into());
        }
        Ok(self.raw.clone())
    }
}
