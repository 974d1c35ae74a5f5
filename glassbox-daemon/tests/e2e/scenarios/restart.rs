//! Restart continuity: a new orchestrator over the same store resumes
//! the version chain where the previous one stopped.

use std::sync::Arc;

use glassbox_core::plugin::PluginManager;

use crate::helpers::config::TestConfigBuilder;
use crate::helpers::memory_repo::MemoryRepository;
use crate::helpers::orchestrator_with;

#[tokio::test]
async fn restarted_monitor_continues_the_version_chain() {
    let repo = Arc::new(MemoryRepository::new());

    // First run: two ticks.
    {
        let config = TestConfigBuilder::new().build();
        let mut orchestrator =
            orchestrator_with(config, PluginManager::new(), repo.clone()).await;
        orchestrator.scan_once().await.expect("tick 1");
        orchestrator.scan_once().await.expect("tick 2");
        assert_eq!(orchestrator.current_version(), "0.0.2");
    }

    // Restart: seed from the persisted chain.
    let config = TestConfigBuilder::new().build();
    let mut orchestrator = orchestrator_with(config, PluginManager::new(), repo.clone()).await;
    assert_eq!(
        orchestrator.current_version(),
        "0.0.2",
        "seeded from the latest Metadata node"
    );

    orchestrator.scan_once().await.expect("tick 3");

    assert_eq!(repo.metadata_versions(), vec!["0.0.1", "0.0.2", "0.0.3"]);
    assert!(repo
        .next_version_pairs()
        .contains(&("0.0.2".to_owned(), "0.0.3".to_owned())));
}
