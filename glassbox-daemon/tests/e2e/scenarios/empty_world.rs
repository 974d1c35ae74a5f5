//! Empty-world scenario: no plugins enabled.
//!
//! After three ticks the store contains exactly three `Metadata` nodes
//! forming a linear `NEXT_VERSION` chain, and nothing else.

use std::sync::Arc;

use glassbox_core::model::ComponentType;
use glassbox_core::plugin::PluginManager;

use crate::helpers::config::TestConfigBuilder;
use crate::helpers::memory_repo::MemoryRepository;
use crate::helpers::orchestrator_with;

#[tokio::test]
async fn three_ticks_build_a_linear_metadata_chain() {
    let repo = Arc::new(MemoryRepository::new());
    let config = TestConfigBuilder::new().build();
    let mut orchestrator = orchestrator_with(config, PluginManager::new(), repo.clone()).await;

    for _ in 0..3 {
        orchestrator.scan_once().await.expect("tick should succeed");
    }

    assert_eq!(
        repo.metadata_versions(),
        vec!["0.0.1", "0.0.2", "0.0.3"],
        "fresh store versions start at 0.0.1"
    );
    assert_eq!(
        repo.next_version_pairs(),
        vec![
            ("0.0.1".to_owned(), "0.0.2".to_owned()),
            ("0.0.2".to_owned(), "0.0.3".to_owned()),
        ],
        "metadata nodes form a linear chain"
    );

    // Nothing but metadata nodes exists.
    assert!(repo
        .nodes()
        .iter()
        .all(|n| n.label == ComponentType::Metadata));
}

#[tokio::test]
async fn versions_are_strictly_monotonic() {
    let repo = Arc::new(MemoryRepository::new());
    let config = TestConfigBuilder::new().build();
    let mut orchestrator = orchestrator_with(config, PluginManager::new(), repo.clone()).await;

    for _ in 0..5 {
        orchestrator.scan_once().await.expect("tick should succeed");
    }

    let parsed: Vec<Vec<u64>> = repo
        .metadata_versions()
        .iter()
        .map(|v| v.split('.').map(|p| p.parse().unwrap()).collect())
        .collect();
    for window in parsed.windows(2) {
        assert!(window[0] < window[1], "versions must strictly increase");
    }
}

#[tokio::test]
async fn writing_the_same_metadata_version_twice_is_a_no_op() {
    let repo = Arc::new(MemoryRepository::new());

    use glassbox_graph_store::GraphRepository;
    repo.create_metadata_node("0.0.1", "2024-03-01 10:00:00")
        .await
        .expect("first write");
    repo.create_metadata_node("0.0.1", "2024-03-01 10:00:30")
        .await
        .expect("second write");

    assert_eq!(repo.metadata_versions(), vec!["0.0.1"]);
    assert!(repo.next_version_pairs().is_empty());
}
