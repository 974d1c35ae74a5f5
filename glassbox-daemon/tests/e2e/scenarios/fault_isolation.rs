//! Fault isolation scenarios.
//!
//! A failing plugin is skipped for the tick; the tick completes and the
//! healthy provider's components exist. A metadata write failure aborts
//! the tick and the spent version is never reused.

use std::sync::Arc;

use glassbox_core::model::ComponentType;
use glassbox_core::plugin::PluginManager;

use crate::helpers::config::TestConfigBuilder;
use crate::helpers::fixtures::openstack_fixture;
use crate::helpers::memory_repo::MemoryRepository;
use crate::helpers::orchestrator_with;
use crate::helpers::plugins::MockPlugin;

#[tokio::test]
async fn failing_plugin_is_skipped_for_the_tick() {
    let repo = Arc::new(MemoryRepository::new());

    let mut plugins = PluginManager::new();
    plugins
        .register_constructor("openstack", move || {
            Box::new(MockPlugin::with_data("openstack", openstack_fixture()))
        })
        .expect("constructor registers");
    plugins
        .register_constructor("kubernetes", || {
            Box::new(MockPlugin::failing_fetch("kubernetes"))
        })
        .expect("constructor registers");

    let config = TestConfigBuilder::new()
        .provider("openstack")
        .provider("kubernetes")
        .build();
    let mut orchestrator = orchestrator_with(config, plugins, repo.clone()).await;

    orchestrator.scan_once().await.expect("tick completes");

    // Metadata exists and the healthy provider's components landed.
    assert_eq!(repo.metadata_versions(), vec!["0.0.1"]);
    assert!(repo.find_node(ComponentType::Instance, "I1", "0.0.1").is_some());
    // Nothing from the failed provider.
    assert!(repo.nodes_with_label(ComponentType::Pod).is_empty());
    assert!(repo.nodes_with_label(ComponentType::ClusterNode).is_empty());
}

#[tokio::test]
async fn plugin_that_fails_init_never_becomes_active() {
    let repo = Arc::new(MemoryRepository::new());

    let mut plugins = PluginManager::new();
    plugins
        .register_constructor("openstack", move || {
            Box::new(MockPlugin::with_data("openstack", openstack_fixture()))
        })
        .expect("constructor registers");
    plugins
        .register_constructor("kubernetes", || {
            Box::new(MockPlugin::failing_init("kubernetes"))
        })
        .expect("constructor registers");

    let config = TestConfigBuilder::new()
        .provider("openstack")
        .provider("kubernetes")
        .build();
    let mut orchestrator = orchestrator_with(config, plugins, repo.clone()).await;

    orchestrator.scan_once().await.expect("tick completes");
    assert!(repo.find_node(ComponentType::Project, "P1", "0.0.1").is_some());
    assert!(repo.nodes_with_label(ComponentType::Pod).is_empty());
}

#[tokio::test]
async fn metadata_failure_aborts_tick_and_spends_the_version() {
    let repo = Arc::new(MemoryRepository::new());

    let mut plugins = PluginManager::new();
    plugins
        .register_constructor("openstack", move || {
            Box::new(MockPlugin::with_data("openstack", openstack_fixture()))
        })
        .expect("constructor registers");

    let config = TestConfigBuilder::new().provider("openstack").build();
    let mut orchestrator = orchestrator_with(config, plugins, repo.clone()).await;

    repo.set_fail_metadata(true);
    orchestrator
        .scan_once()
        .await
        .expect_err("metadata failure aborts the tick");

    // Nothing was written, but the version was consumed.
    assert!(repo.nodes().is_empty());
    assert_eq!(orchestrator.current_version(), "0.0.1");

    repo.set_fail_metadata(false);
    orchestrator.scan_once().await.expect("next tick succeeds");

    // The spent version is skipped, not reused.
    assert_eq!(repo.metadata_versions(), vec!["0.0.2"]);
    assert!(repo.find_node(ComponentType::Instance, "I1", "0.0.2").is_some());
}
