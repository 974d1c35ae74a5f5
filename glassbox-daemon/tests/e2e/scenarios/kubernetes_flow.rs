//! Kubernetes scenario with a personal-data annotation, plus the
//! cross-provider linkage: the cluster node is backed by an OpenStack
//! instance emitted by a different plugin in the same tick.

use std::sync::Arc;

use glassbox_core::model::ComponentType;
use glassbox_core::plugin::PluginManager;

use crate::helpers::config::TestConfigBuilder;
use crate::helpers::fixtures::{kubernetes_fixture, openstack_fixture};
use crate::helpers::memory_repo::MemoryRepository;
use crate::helpers::orchestrator_with;
use crate::helpers::plugins::MockPlugin;

async fn run_one_tick(repo: Arc<MemoryRepository>) {
    let mut plugins = PluginManager::new();
    plugins
        .register_constructor("openstack", move || {
            Box::new(MockPlugin::with_data("openstack", openstack_fixture()))
        })
        .expect("constructor registers");
    plugins
        .register_constructor("kubernetes", move || {
            Box::new(MockPlugin::with_data("kubernetes", kubernetes_fixture()))
        })
        .expect("constructor registers");

    let config = TestConfigBuilder::new()
        .provider("openstack")
        .provider("kubernetes")
        .build();
    let mut orchestrator = orchestrator_with(config, plugins, repo).await;
    orchestrator.scan_once().await.expect("tick should succeed");
}

#[tokio::test]
async fn pod_with_pd_annotation_materializes_full_chain() {
    let repo = Arc::new(MemoryRepository::new());
    run_one_tick(repo.clone()).await;

    let version = "0.0.1";
    for (label, id) in [
        (ComponentType::ClusterNode, "node-uid-1"),
        (ComponentType::PersistentVolume, "pv-uid-1"),
        (ComponentType::PersistentVolumeClaim, "C1"),
        (ComponentType::Pod, "pod-uid-1"),
        (ComponentType::PdIndicator, "pd_indicator_pod-uid-1"),
        (ComponentType::DataCategory, "X"),
    ] {
        assert!(
            repo.find_node(label, id, version).is_some(),
            "expected {label}({id}) at {version}"
        );
    }

    use glassbox_core::model::ComponentType as C;
    assert!(repo.edge_exists(
        "STORED_ON",
        (C::PersistentVolume, "pv-uid-1"),
        (C::Volume, "V1"),
        version
    ));
    assert!(repo.edge_exists(
        "BINDS_TO",
        (C::PersistentVolumeClaim, "C1"),
        (C::PersistentVolume, "pv-uid-1"),
        version
    ));
    // RUNS_ON resolves the cluster node by name, not by uid.
    assert!(repo.edge_exists(
        "RUNS_ON",
        (C::Pod, "pod-uid-1"),
        (C::ClusterNode, "node-uid-1"),
        version
    ));
    assert!(repo.edge_exists(
        "USES_PVC",
        (C::Pod, "pod-uid-1"),
        (C::PersistentVolumeClaim, "C1"),
        version
    ));
    assert!(repo.edge_exists(
        "HAS_PD",
        (C::Pod, "pod-uid-1"),
        (C::PdIndicator, "pd_indicator_pod-uid-1"),
        version
    ));
    assert!(repo.edge_exists(
        "HAS_CATEGORY",
        (C::PdIndicator, "pd_indicator_pod-uid-1"),
        (C::DataCategory, "X"),
        version
    ));
}

#[tokio::test]
async fn cluster_node_links_to_instance_from_other_provider() {
    let repo = Arc::new(MemoryRepository::new());
    run_one_tick(repo.clone()).await;

    use glassbox_core::model::ComponentType as C;
    let version = "0.0.1";
    assert!(
        repo.edge_exists(
            "PROVISIONED_BY",
            (C::ClusterNode, "node-uid-1"),
            (C::Instance, "I1"),
            version
        ),
        "cross-provider edge resolves within the same version"
    );

    let node = repo.find_node(C::ClusterNode, "node-uid-1", version).unwrap();
    let instance = repo.find_node(C::Instance, "I1", version).unwrap();
    assert_eq!(node.version, instance.version);
}

#[tokio::test]
async fn data_category_nodes_carry_the_snapshot_version() {
    let repo = Arc::new(MemoryRepository::new());
    run_one_tick(repo.clone()).await;

    let categories = repo.nodes_with_label(ComponentType::DataCategory);
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].version, "0.0.1");
    assert_eq!(categories[0].metadata["purpose"], serde_json::json!("p"));
}
