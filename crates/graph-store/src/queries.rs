//! 읽기 측 프로젝션 쿼리
//!
//! 감사 질의("버전 V에서 카테고리 X의 데이터를 처리한 워크로드는?")를
//! 위한 얇은 조회 계층입니다. 쓰기 경로와 같은 그래프 모델을 읽습니다.

use std::sync::Arc;

use neo4rs::{Graph, Query};
use serde::{Deserialize, Serialize};

use crate::error::GraphStoreError;

/// 스냅샷 그래프 조회 인터페이스
pub struct GraphQueries {
    graph: Arc<Graph>,
}

/// 카테고리 질의 결과의 파드 레코드
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodRecord {
    pub id: String,
    pub name: String,
    pub created_at: Option<String>,
}

/// 프로젝트 질의 결과의 인스턴스 레코드
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub id: String,
    pub name: String,
    pub status: Option<String>,
    pub created: Option<String>,
}

impl GraphQueries {
    /// 조회 인터페이스를 생성합니다.
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    /// 버전 `version`에서 카테고리 `category`의 개인정보를 선언한
    /// 파드를 찾습니다.
    pub async fn pods_with_category(
        &self,
        version: &str,
        category: &str,
    ) -> Result<Vec<PodRecord>, GraphStoreError> {
        let query = Query::new(
            "MATCH (p:Pod)-[:HAS_PD]->(:PDIndicator)-[:HAS_CATEGORY]->(dc:DataCategory) \
             WHERE p.version = $version AND dc.name = $category \
             RETURN p.id AS id, p.name AS name, p.createdAt AS createdAt"
                .to_owned(),
        )
        .param("version", version)
        .param("category", category);

        let mut stream = self.graph.execute(query).await?;
        let mut pods = Vec::new();
        while let Some(row) = stream.next().await? {
            pods.push(PodRecord {
                id: row.get::<String>("id").unwrap_or_default(),
                name: row.get::<String>("name").unwrap_or_default(),
                created_at: row.get::<String>("createdAt").ok(),
            });
        }
        Ok(pods)
    }

    /// 버전 `version`에서 프로젝트 `project_id`에 속한 인스턴스를
    /// 찾습니다.
    pub async fn instances_by_project(
        &self,
        version: &str,
        project_id: &str,
    ) -> Result<Vec<InstanceRecord>, GraphStoreError> {
        let query = Query::new(
            "MATCH (i:Instance)-[:BELONGS_TO]->(p:Project {id: $project_id}) \
             WHERE i.version = $version \
             RETURN i.id AS id, i.name AS name, i.status AS status, i.created AS created"
                .to_owned(),
        )
        .param("version", version)
        .param("project_id", project_id);

        let mut stream = self.graph.execute(query).await?;
        let mut instances = Vec::new();
        while let Some(row) = stream.next().await? {
            instances.push(InstanceRecord {
                id: row.get::<String>("id").unwrap_or_default(),
                name: row.get::<String>("name").unwrap_or_default(),
                status: row.get::<String>("status").ok(),
                created: row.get::<String>("created").ok(),
            });
        }
        Ok(instances)
    }

    /// `NEXT_VERSION` 체인을 오래된 순으로 반환합니다.
    pub async fn version_chain(&self) -> Result<Vec<String>, GraphStoreError> {
        let query = Query::new(
            "MATCH (m:Metadata) RETURN m.version AS version ORDER BY m.scanTimestamp ASC"
                .to_owned(),
        );

        let mut stream = self.graph.execute(query).await?;
        let mut versions = Vec::new();
        while let Some(row) = stream.next().await? {
            if let Ok(version) = row.get::<String>("version") {
                versions.push(version);
            }
        }
        Ok(versions)
    }
}
