//! Shared E2E test helpers.
//!
//! Provides reusable utilities for building test configurations,
//! constructing mock provider plugins with canned snapshots, and an
//! in-memory `GraphRepository` implementation for asserting on the
//! written graph.

pub mod config;
pub mod fixtures;
pub mod memory_repo;
pub mod plugins;

use std::sync::Arc;

use glassbox_core::config::GlassboxConfig;
use glassbox_core::plugin::PluginManager;
use glassbox_daemon::orchestrator::{default_transformer_registry, Orchestrator};

use self::memory_repo::MemoryRepository;

/// Assemble an orchestrator over the in-memory repository with the
/// built-in transformer registry.
pub async fn orchestrator_with(
    config: GlassboxConfig,
    plugins: PluginManager,
    repo: Arc<MemoryRepository>,
) -> Orchestrator {
    Orchestrator::assemble(
        config,
        plugins,
        default_transformer_registry().expect("transformer registry"),
        repo,
    )
    .await
    .expect("orchestrator should assemble")
}
