//! In-memory `GraphRepository` implementation for E2E tests.
//!
//! Reproduces the Neo4j writer's semantics over plain vectors: CREATE
//! node semantics, MERGE metadata nodes keyed by version, and
//! version-scoped edge resolution driven by the shared
//! [`edge_rule`](glassbox_graph_store::edge_rule) table. Because both
//! implementations consult the same table, resolution semantics cannot
//! drift between production and tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use glassbox_core::model::{Component, ComponentType};
use glassbox_graph_store::{edge_rule, GraphRepository, GraphStoreError, MatchField};

/// A node in the in-memory graph.
#[derive(Debug, Clone)]
pub struct MemoryNode {
    pub label: ComponentType,
    pub uuid: String,
    pub id: String,
    pub name: String,
    pub version: String,
    pub metadata: serde_json::Map<String, Value>,
}

/// A directed edge between two node uuids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEdge {
    pub relationship: String,
    pub from_uuid: String,
    pub to_uuid: String,
}

#[derive(Default)]
struct Inner {
    nodes: Vec<MemoryNode>,
    edges: Vec<MemoryEdge>,
    constraints_installed: bool,
}

/// In-memory graph repository with failure injection.
#[derive(Default)]
pub struct MemoryRepository {
    inner: Mutex<Inner>,
    fail_metadata: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_metadata_node` calls fail.
    pub fn set_fail_metadata(&self, fail: bool) {
        self.fail_metadata.store(fail, Ordering::SeqCst);
    }

    pub fn constraints_installed(&self) -> bool {
        self.inner.lock().unwrap().constraints_installed
    }

    pub fn nodes(&self) -> Vec<MemoryNode> {
        self.inner.lock().unwrap().nodes.clone()
    }

    pub fn edges(&self) -> Vec<MemoryEdge> {
        self.inner.lock().unwrap().edges.clone()
    }

    pub fn nodes_with_label(&self, label: ComponentType) -> Vec<MemoryNode> {
        self.nodes()
            .into_iter()
            .filter(|n| n.label == label)
            .collect()
    }

    pub fn find_node(&self, label: ComponentType, id: &str, version: &str) -> Option<MemoryNode> {
        self.nodes()
            .into_iter()
            .find(|n| n.label == label && n.id == id && n.version == version)
    }

    pub fn node_by_uuid(&self, uuid: &str) -> Option<MemoryNode> {
        self.nodes().into_iter().find(|n| n.uuid == uuid)
    }

    /// Metadata versions in write order.
    pub fn metadata_versions(&self) -> Vec<String> {
        self.nodes_with_label(ComponentType::Metadata)
            .into_iter()
            .map(|n| n.version)
            .collect()
    }

    /// `NEXT_VERSION` edges as (from-version, to-version) pairs.
    pub fn next_version_pairs(&self) -> Vec<(String, String)> {
        self.edges()
            .into_iter()
            .filter(|e| e.relationship == "NEXT_VERSION")
            .map(|e| {
                let from = self.node_by_uuid(&e.from_uuid).expect("edge source exists");
                let to = self.node_by_uuid(&e.to_uuid).expect("edge target exists");
                (from.version, to.version)
            })
            .collect()
    }

    /// Whether an edge exists between two nodes identified by (label, id)
    /// within one version.
    pub fn edge_exists(
        &self,
        relationship: &str,
        from: (ComponentType, &str),
        to: (ComponentType, &str),
        version: &str,
    ) -> bool {
        let Some(from_node) = self.find_node(from.0, from.1, version) else {
            return false;
        };
        let Some(to_node) = self.find_node(to.0, to.1, version) else {
            return false;
        };
        self.edges().iter().any(|e| {
            e.relationship == relationship
                && e.from_uuid == from_node.uuid
                && e.to_uuid == to_node.uuid
        })
    }

    fn push_node(
        inner: &mut Inner,
        label: ComponentType,
        id: &str,
        name: &str,
        version: &str,
        metadata: serde_json::Map<String, Value>,
    ) -> String {
        let uuid = uuid::Uuid::new_v4().to_string();
        inner.nodes.push(MemoryNode {
            label,
            uuid: uuid.clone(),
            id: id.to_owned(),
            name: name.to_owned(),
            version: version.to_owned(),
            metadata,
        });
        uuid
    }

    fn merge_edge(inner: &mut Inner, relationship: &str, from_uuid: &str, to_uuid: &str) {
        let edge = MemoryEdge {
            relationship: relationship.to_owned(),
            from_uuid: from_uuid.to_owned(),
            to_uuid: to_uuid.to_owned(),
        };
        if !inner.edges.contains(&edge) {
            inner.edges.push(edge);
        }
    }
}

#[async_trait]
impl GraphRepository for MemoryRepository {
    async fn setup_constraints(&self) -> Result<(), GraphStoreError> {
        self.inner.lock().unwrap().constraints_installed = true;
        Ok(())
    }

    async fn latest_version(&self) -> Result<Option<String>, GraphStoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .nodes
            .iter()
            .filter(|n| n.label == ComponentType::Metadata)
            .next_back()
            .map(|n| n.version.clone()))
    }

    async fn create_metadata_node(
        &self,
        version: &str,
        timestamp: &str,
    ) -> Result<(), GraphStoreError> {
        if self.fail_metadata.load(Ordering::SeqCst) {
            return Err(GraphStoreError::Connection(
                "injected metadata failure".to_owned(),
            ));
        }

        let mut inner = self.inner.lock().unwrap();

        // MERGE on version: a second write of the same version is a no-op.
        if inner
            .nodes
            .iter()
            .any(|n| n.label == ComponentType::Metadata && n.version == version)
        {
            return Ok(());
        }

        let previous = inner
            .nodes
            .iter()
            .filter(|n| n.label == ComponentType::Metadata)
            .next_back()
            .map(|n| n.uuid.clone());

        let mut metadata = serde_json::Map::new();
        metadata.insert("scanTimestamp".to_owned(), Value::String(timestamp.to_owned()));
        let uuid = Self::push_node(
            &mut inner,
            ComponentType::Metadata,
            version,
            version,
            version,
            metadata,
        );

        if let Some(previous_uuid) = previous {
            Self::merge_edge(&mut inner, "NEXT_VERSION", &previous_uuid, &uuid);
        }
        Ok(())
    }

    async fn create_component(
        &self,
        version: &str,
        component: &Component,
    ) -> Result<String, GraphStoreError> {
        match component.component_type {
            ComponentType::Metadata | ComponentType::DataCategory => {
                Err(GraphStoreError::Unsupported(format!(
                    "{} nodes are created by dedicated operations",
                    component.component_type
                )))
            }
            ComponentType::PdIndicator => {
                let payload = component
                    .metadata
                    .get("has_pd")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        GraphStoreError::InvalidPayload("missing has_pd document".to_owned())
                    })?;
                let parsed: Value = serde_json::from_str(payload).map_err(|e| {
                    GraphStoreError::InvalidPayload(format!("invalid has_pd JSON: {e}"))
                })?;

                let mut inner = self.inner.lock().unwrap();
                let pd_uuid = Self::push_node(
                    &mut inner,
                    ComponentType::PdIndicator,
                    &component.id,
                    &component.name,
                    version,
                    component.metadata.clone(),
                );

                for category in parsed
                    .get("dataCategories")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default()
                {
                    let name = category
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_owned();
                    let mut metadata = serde_json::Map::new();
                    for key in ["purpose", "legalBasis", "storage"] {
                        if let Some(value) = category.get(key) {
                            metadata.insert(key.to_owned(), value.clone());
                        }
                    }
                    let category_uuid = Self::push_node(
                        &mut inner,
                        ComponentType::DataCategory,
                        &name,
                        &name,
                        version,
                        metadata,
                    );
                    Self::merge_edge(&mut inner, "HAS_CATEGORY", &pd_uuid, &category_uuid);
                }
                Ok(pd_uuid)
            }
            _ => {
                let mut inner = self.inner.lock().unwrap();
                Ok(Self::push_node(
                    &mut inner,
                    component.component_type,
                    &component.id,
                    &component.name,
                    version,
                    component.metadata.clone(),
                ))
            }
        }
    }

    async fn link_project_to_metadata(
        &self,
        version: &str,
        project_uuid: &str,
    ) -> Result<(), GraphStoreError> {
        let mut inner = self.inner.lock().unwrap();
        let metadata_uuid = inner
            .nodes
            .iter()
            .find(|n| n.label == ComponentType::Metadata && n.version == version)
            .map(|n| n.uuid.clone());
        let project_uuid = inner
            .nodes
            .iter()
            .find(|n| n.label == ComponentType::Project && n.uuid == project_uuid)
            .map(|n| n.uuid.clone());

        // Best-effort: missing endpoints produce no edge.
        if let (Some(metadata_uuid), Some(project_uuid)) = (metadata_uuid, project_uuid) {
            Self::merge_edge(&mut inner, "SCANNED", &metadata_uuid, &project_uuid);
        }
        Ok(())
    }

    async fn create_relationships(
        &self,
        version: &str,
        component: &Component,
    ) -> Result<(), GraphStoreError> {
        let mut inner = self.inner.lock().unwrap();

        for relationship in &component.relationships {
            let Some(rule) = edge_rule(component.component_type, relationship.relationship_type)
            else {
                continue;
            };

            let source_uuid = inner
                .nodes
                .iter()
                .find(|n| {
                    n.label == component.component_type
                        && n.id == component.id
                        && n.version == version
                })
                .map(|n| n.uuid.clone());
            let target_uuid = inner
                .nodes
                .iter()
                .find(|n| {
                    let matched = match rule.match_field {
                        MatchField::Id => n.id == relationship.target,
                        MatchField::Name => n.name == relationship.target,
                    };
                    n.label == rule.target && matched && n.version == version
                })
                .map(|n| n.uuid.clone());

            // Missing endpoints silently yield zero edges.
            if let (Some(source_uuid), Some(target_uuid)) = (source_uuid, target_uuid) {
                Self::merge_edge(
                    &mut inner,
                    relationship.relationship_type.name(),
                    &source_uuid,
                    &target_uuid,
                );
            }
        }
        Ok(())
    }
}
