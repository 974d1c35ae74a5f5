//! Neo4j 저장소 구현
//!
//! 모든 노드는 `{uuid, version, id, name, type, availabilityZone}` 기본
//! 속성에 유형별 메타데이터 프로젝션을 더해 CREATE 의미로 기록됩니다.
//! bolt 프로토콜로는 저장소 측 트리거를 설치할 수 없으므로 `uuid`는
//! 라이터가 직접 생성해 부여합니다. 간선은 같은 `version`의 두 끝점을
//! MATCH한 뒤 MERGE합니다. 모든 쿼리는 타임아웃으로 감쌉니다.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use neo4rs::{BoltList, BoltMap, BoltNull, BoltString, BoltType, Graph, Query, Row};
use serde_json::Value;
use uuid::Uuid;

use glassbox_core::model::{Component, ComponentType};

use crate::config::GraphStoreConfig;
use crate::error::GraphStoreError;
use crate::repository::GraphRepository;
use crate::schema::{edge_rule, EdgeRule, KNOWN_LABELS};
use crate::utils::metadata_param;

/// Neo4j 기반 그래프 저장소
pub struct Neo4jRepository {
    graph: Arc<Graph>,
    query_timeout: Duration,
}

impl Neo4jRepository {
    /// Neo4j에 연결합니다.
    pub async fn connect(config: &GraphStoreConfig) -> Result<Self, GraphStoreError> {
        tracing::info!(uri = %config.uri, "connecting to graph store");
        let graph = Graph::new(&config.uri, &config.user, &config.password)
            .await
            .map_err(|e| GraphStoreError::Connection(e.to_string()))?;
        Ok(Self {
            graph: Arc::new(graph),
            query_timeout: Duration::from_secs(config.query_timeout_secs),
        })
    }

    /// 읽기 측 쿼리([`GraphQueries`](crate::GraphQueries))용 드라이버 핸들
    pub fn graph(&self) -> Arc<Graph> {
        Arc::clone(&self.graph)
    }

    async fn run(&self, query: Query) -> Result<(), GraphStoreError> {
        tokio::time::timeout(self.query_timeout, self.graph.run(query))
            .await
            .map_err(|_| GraphStoreError::Timeout {
                secs: self.query_timeout.as_secs(),
            })?
            .map_err(GraphStoreError::from)
    }

    async fn first_row(&self, query: Query) -> Result<Option<Row>, GraphStoreError> {
        let fetch = async {
            let mut stream = self.graph.execute(query).await?;
            stream.next().await
        };
        tokio::time::timeout(self.query_timeout, fetch)
            .await
            .map_err(|_| GraphStoreError::Timeout {
                secs: self.query_timeout.as_secs(),
            })?
            .map_err(GraphStoreError::from)
    }

    async fn create_node(
        &self,
        version: &str,
        component: &Component,
    ) -> Result<String, GraphStoreError> {
        let uuid = Uuid::new_v4().to_string();
        let label = component.component_type.label();

        let mut props = base_props(&uuid, version, component);
        for (key, value) in type_projection(component) {
            props.value.insert(BoltString::from(key), value);
        }

        let query = Query::new(format!("CREATE (n:{label}) SET n = $props"))
            .param("props", BoltType::Map(props));
        self.run(query).await?;
        Ok(uuid)
    }

    /// PDIndicator 노드와 선언된 카테고리별 `DataCategory` 노드 +
    /// `HAS_CATEGORY` 간선을 하나의 쿼리로 만듭니다.
    async fn create_pd_indicator(
        &self,
        version: &str,
        component: &Component,
    ) -> Result<String, GraphStoreError> {
        let uuid = Uuid::new_v4().to_string();
        let categories = parse_pd_categories(component)?;

        let mut category_list = BoltList::default();
        for category in &categories {
            let mut entry = BoltMap::default();
            let fields = [
                ("uuid", Uuid::new_v4().to_string()),
                ("version", version.to_owned()),
                ("name", category.name.clone()),
                ("purpose", category.purpose.clone()),
                ("legalBasis", category.legal_basis.clone()),
                ("storage", category.storage.clone()),
            ];
            for (key, value) in fields {
                entry
                    .value
                    .insert(BoltString::from(key), BoltType::String(BoltString::from(value.as_str())));
            }
            category_list.value.push(BoltType::Map(entry));
        }

        let props = base_props(&uuid, version, component);
        let query = Query::new(
            "CREATE (pd:PDIndicator) SET pd = $props \
             WITH pd UNWIND $categories AS category \
             CREATE (pd)-[:HAS_CATEGORY]->(dc:DataCategory) SET dc = category"
                .to_owned(),
        )
        .param("props", BoltType::Map(props))
        .param("categories", BoltType::List(category_list));

        self.run(query).await?;
        Ok(uuid)
    }
}

#[async_trait]
impl GraphRepository for Neo4jRepository {
    async fn setup_constraints(&self) -> Result<(), GraphStoreError> {
        for label in KNOWN_LABELS {
            let query = format!(
                "CREATE CONSTRAINT IF NOT EXISTS FOR (n:{}) REQUIRE n.uuid IS UNIQUE",
                label.label()
            );
            self.run(Query::new(query)).await.map_err(|e| {
                GraphStoreError::Constraint {
                    label: label.label().to_owned(),
                    reason: e.to_string(),
                }
            })?;
        }

        // Metadata 버전은 체인 전체에서 유일해야 한다.
        self.run(Query::new(
            "CREATE CONSTRAINT IF NOT EXISTS FOR (m:Metadata) REQUIRE m.version IS UNIQUE"
                .to_owned(),
        ))
        .await
        .map_err(|e| GraphStoreError::Constraint {
            label: "Metadata".to_owned(),
            reason: e.to_string(),
        })?;

        tracing::debug!(labels = KNOWN_LABELS.len(), "uniqueness constraints installed");
        Ok(())
    }

    async fn latest_version(&self) -> Result<Option<String>, GraphStoreError> {
        let query = Query::new(
            "MATCH (m:Metadata) RETURN m.version AS version \
             ORDER BY m.scanTimestamp DESC LIMIT 1"
                .to_owned(),
        );
        Ok(self
            .first_row(query)
            .await?
            .and_then(|row| row.get::<String>("version").ok()))
    }

    async fn create_metadata_node(
        &self,
        version: &str,
        timestamp: &str,
    ) -> Result<(), GraphStoreError> {
        let previous = self.latest_version().await?;

        let uuid = Uuid::new_v4().to_string();
        let query = Query::new(
            "MERGE (m:Metadata {version: $version}) \
             ON CREATE SET m.uuid = $uuid, m.type = 'Metadata', m.scanTimestamp = $timestamp"
                .to_owned(),
        )
        .param("version", version)
        .param("uuid", uuid.as_str())
        .param("timestamp", timestamp);
        self.run(query).await?;

        if let Some(previous) = previous {
            if previous != version {
                let link = Query::new(
                    "MATCH (prev:Metadata {version: $previous}), \
                           (next:Metadata {version: $version}) \
                     MERGE (prev)-[:NEXT_VERSION]->(next)"
                        .to_owned(),
                )
                .param("previous", previous.as_str())
                .param("version", version);
                self.run(link).await?;
            }
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
            ComponentType::PdIndicator => self.create_pd_indicator(version, component).await,
            _ => self.create_node(version, component).await,
        }
    }

    async fn link_project_to_metadata(
        &self,
        version: &str,
        project_uuid: &str,
    ) -> Result<(), GraphStoreError> {
        let query = Query::new(
            "MATCH (m:Metadata {version: $version}), (p:Project {uuid: $uuid}) \
             MERGE (m)-[:SCANNED]->(p)"
                .to_owned(),
        )
        .param("version", version)
        .param("uuid", project_uuid);
        self.run(query).await
    }

    async fn create_relationships(
        &self,
        version: &str,
        component: &Component,
    ) -> Result<(), GraphStoreError> {
        for relationship in &component.relationships {
            let Some(rule) = edge_rule(component.component_type, relationship.relationship_type)
            else {
                tracing::warn!(
                    component_type = %component.component_type,
                    relationship = %relationship.relationship_type,
                    id = %component.id,
                    "no edge rule for relationship, skipping"
                );
                continue;
            };

            let query = Query::new(edge_query_text(component.component_type, relationship.relationship_type, rule))
                .param("source_id", component.id.as_str())
                .param("target", relationship.target.as_str())
                .param("version", version);

            // 간선 하나의 실패는 그 간선만 건너뛴다.
            if let Err(e) = self.run(query).await {
                tracing::error!(
                    component_type = %component.component_type,
                    relationship = %relationship.relationship_type,
                    id = %component.id,
                    version = %version,
                    error = %e,
                    "failed to create relationship"
                );
            }
        }
        Ok(())
    }
}

/// `{uuid, version, id, name, type, availabilityZone}` 기본 속성 맵
fn base_props(uuid: &str, version: &str, component: &Component) -> BoltMap {
    let mut props = BoltMap::default();
    let mut put = |key: &str, value: BoltType| {
        props.value.insert(BoltString::from(key), value);
    };
    put("uuid", BoltType::String(BoltString::from(uuid)));
    put("version", BoltType::String(BoltString::from(version)));
    put("id", BoltType::String(BoltString::from(component.id.as_str())));
    put("name", BoltType::String(BoltString::from(component.name.as_str())));
    put(
        "type",
        BoltType::String(BoltString::from(component.component_type.label())),
    );
    put(
        "availabilityZone",
        match &component.availability_zone {
            Some(zone) => BoltType::String(BoltString::from(zone.as_str())),
            None => BoltType::Null(BoltNull),
        },
    );
    props
}

/// 유형별 메타데이터 프로젝션
///
/// 변환기가 싣는 메타데이터 키 중 노드 속성으로 보존할 부분집합을
/// 고릅니다. 빠진 키는 null로 설정되어 속성이 생기지 않습니다.
fn type_projection(component: &Component) -> Vec<(&'static str, BoltType)> {
    let metadata = &component.metadata;
    let keys: &[(&'static str, &'static str)] = match component.component_type {
        ComponentType::Project => &[("enabled", "enabled"), ("description", "description")],
        ComponentType::Instance => &[
            ("userID", "userID"),
            ("hostID", "hostID"),
            ("tenantID", "tenantID"),
            ("created", "created"),
            ("updated", "updated"),
            ("volumesAttached", "volumesAttached"),
            ("status", "status"),
        ],
        ComponentType::Volume => &[
            ("status", "status"),
            ("size", "size"),
            ("bootable", "bootable"),
            ("encrypted", "encrypted"),
            ("multiattach", "multiattach"),
            ("device", "device"),
            ("snapshotID", "snapshotID"),
        ],
        ComponentType::Snapshot => &[
            ("status", "status"),
            ("size", "size"),
            ("createdAt", "createdAt"),
            ("updatedAt", "updatedAt"),
            ("description", "description"),
            ("userID", "userID"),
            ("groupSnapshotID", "groupSnapshotID"),
        ],
        ComponentType::ClusterNode => &[("createdAt", "createdAt")],
        ComponentType::Pod => &[("createdAt", "createdAt"), ("storage", "volumes")],
        ComponentType::PersistentVolume => &[("createdAt", "createdAt")],
        ComponentType::PhysicalHost | ComponentType::PersistentVolumeClaim => &[],
        // PDIndicator / DataCategory / Metadata는 전용 경로로 만든다.
        _ => &[],
    };

    keys.iter()
        .map(|(property, metadata_key)| (*property, metadata_param(metadata, metadata_key)))
        .collect()
}

/// 버전 스코프 간선 MATCH + MERGE 쿼리 텍스트
fn edge_query_text(
    source: ComponentType,
    relationship: glassbox_core::model::RelationshipType,
    rule: EdgeRule,
) -> String {
    format!(
        "MATCH (a:{src} {{id: $source_id, version: $version}}), \
               (b:{tgt} {{{field}: $target, version: $version}}) \
         MERGE (a)-[:{rel}]->(b)",
        src = source.label(),
        tgt = rule.target.label(),
        field = rule.match_field.property(),
        rel = relationship.name(),
    )
}

/// 선언된 개인정보 카테고리
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PdCategory {
    pub name: String,
    pub purpose: String,
    pub legal_basis: String,
    pub storage: String,
}

/// PDIndicator 메타데이터의 `has_pd` JSON에서 카테고리 목록을 꺼냅니다.
fn parse_pd_categories(component: &Component) -> Result<Vec<PdCategory>, GraphStoreError> {
    let payload = component
        .metadata
        .get("has_pd")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            GraphStoreError::InvalidPayload(
                "pd indicator metadata is missing the has_pd document".to_owned(),
            )
        })?;

    let parsed: Value = serde_json::from_str(payload).map_err(|e| {
        GraphStoreError::InvalidPayload(format!("has_pd document is not valid JSON: {e}"))
    })?;

    let categories = parsed
        .get("dataCategories")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    Ok(categories
        .iter()
        .map(|category| {
            let field = |key: &str| {
                category
                    .get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned()
            };
            PdCategory {
                name: field("name"),
                purpose: field("purpose"),
                legal_basis: field("legalBasis"),
                storage: field("storage"),
            }
        })
        .collect())
}
