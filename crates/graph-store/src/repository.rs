//! 저장소 계약 — 오케스트레이터가 의존하는 그래프 저장소 인터페이스
//!
//! 스냅샷 파이프라인이 필요로 하는 쓰기 연산 전부를 하나의 trait으로
//! 모읍니다. 프로덕션 구현은 [`Neo4jRepository`](crate::Neo4jRepository),
//! 테스트는 인메모리 구현을 사용합니다.

use async_trait::async_trait;

use glassbox_core::model::Component;

use crate::error::GraphStoreError;

/// 버전 부여 스냅샷 그래프 저장소 계약
///
/// # 의미
///
/// - 노드 생성은 CREATE 의미입니다: 같은 버전에서 같은 `id`로 두 번
///   호출하면 노드가 두 개 생깁니다. 중복 제거는 변환기의 책임입니다.
/// - 간선 생성은 같은 `version`의 두 노드를 MATCH한 뒤 간선을 MERGE
///   합니다 (버전 안에서 멱등). 끝점이 없으면 조용히 0개의 간선이
///   생깁니다 — 최선 노력 토폴로지입니다.
/// - 노드는 절대 삭제되지 않습니다. 변경은 버전으로 대체됩니다.
#[async_trait]
pub trait GraphRepository: Send + Sync {
    /// 알려진 모든 레이블에 유일성 제약을 설치합니다.
    ///
    /// 시작 시 한 번 호출되며, 실패는 기동을 중단시킵니다.
    async fn setup_constraints(&self) -> Result<(), GraphStoreError>;

    /// 가장 최근에 기록된 `Metadata` 버전을 반환합니다.
    ///
    /// 저장소가 비어 있으면 `Ok(None)`.
    async fn latest_version(&self) -> Result<Option<String>, GraphStoreError>;

    /// 버전 `version`의 `Metadata` 노드를 기록합니다.
    ///
    /// 직전 버전이 존재하면 `(이전)-[:NEXT_VERSION]->(신규)` 간선을
    /// 함께 기록합니다. 노드는 `version` 기준 MERGE이므로 같은 버전으로
    /// 두 번 호출해도 노드는 하나입니다.
    async fn create_metadata_node(
        &self,
        version: &str,
        timestamp: &str,
    ) -> Result<(), GraphStoreError>;

    /// 컴포넌트 유형에 해당하는 레이블의 노드를 만들고 `uuid`를
    /// 반환합니다.
    ///
    /// `PDIndicator`는 메타데이터의 선언 JSON을 전개하여 `DataCategory`
    /// 노드들과 `HAS_CATEGORY` 간선까지 함께 만듭니다.
    async fn create_component(
        &self,
        version: &str,
        component: &Component,
    ) -> Result<String, GraphStoreError>;

    /// `Metadata(version) -[:SCANNED]-> Project(uuid)` 간선을 기록합니다.
    async fn link_project_to_metadata(
        &self,
        version: &str,
        project_uuid: &str,
    ) -> Result<(), GraphStoreError>;

    /// 컴포넌트의 아웃바운드 간선들을 버전 스코프로 해석해 기록합니다.
    ///
    /// 노드 단계가 끝난 뒤에 호출되어야 합니다. 간선 해석 규칙은
    /// [`edge_rule`](crate::schema::edge_rule)을 따릅니다.
    async fn create_relationships(
        &self,
        version: &str,
        component: &Component,
    ) -> Result<(), GraphStoreError>;
}
