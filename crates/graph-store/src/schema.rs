//! 그래프 스키마 — 레이블 집합과 간선 해석 규칙
//!
//! 간선 해석 테이블은 `(출발 유형, 관계 유형)`마다 대상 레이블과
//! 매칭 필드를 지정합니다. Neo4j 라이터와 테스트용 인메모리 저장소가
//! 같은 테이블을 공유하므로 해석 의미가 둘 사이에서 어긋날 수 없습니다.

use glassbox_core::model::{ComponentType, RelationshipType};

/// 시작 시 `uuid` 유일성 제약이 설치되는 레이블의 닫힌 집합
pub const KNOWN_LABELS: [ComponentType; 12] = [
    ComponentType::Metadata,
    ComponentType::Project,
    ComponentType::Instance,
    ComponentType::Volume,
    ComponentType::Snapshot,
    ComponentType::ClusterNode,
    ComponentType::Pod,
    ComponentType::PhysicalHost,
    ComponentType::PersistentVolume,
    ComponentType::PersistentVolumeClaim,
    ComponentType::PdIndicator,
    ComponentType::DataCategory,
];

/// 간선 대상 노드를 찾을 때 사용하는 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    /// 프로바이더 ID로 매칭
    Id,
    /// 이름으로 매칭 (쿠버네티스의 이름 기반 참조)
    Name,
}

impl MatchField {
    /// 그래프 속성 이름
    pub fn property(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
        }
    }
}

/// 간선 해석 규칙: 대상 레이블과 매칭 필드
///
/// 출발 노드는 항상 `(레이블, id, version)`으로 매칭됩니다.
/// 대상 노드는 같은 `version` 안에서 이 규칙으로 매칭됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRule {
    /// 대상 노드 레이블
    pub target: ComponentType,
    /// 대상 매칭 필드
    pub match_field: MatchField,
}

/// `(출발 유형, 관계 유형)`의 간선 해석 규칙을 반환합니다.
///
/// 테이블에 없는 조합은 변환기가 방출하지 않는 조합이며 `None`을
/// 반환합니다. `HAS_CATEGORY`는 PDIndicator 생성 시 전개되고,
/// `SCANNED` / `NEXT_VERSION`은 메타데이터 연산이 직접 기록하므로
/// 여기에 없습니다.
pub fn edge_rule(source: ComponentType, relationship: RelationshipType) -> Option<EdgeRule> {
    use glassbox_core::model::ComponentType as C;
    use glassbox_core::model::RelationshipType as R;
    use crate::schema::MatchField as M;

    let rule = |target, match_field| Some(EdgeRule { target, match_field });

    match (source, relationship) {
        (C::Instance, R::BelongsTo) => rule(C::Project, M::Id),
        (C::Instance, R::AssignedHost) => rule(C::PhysicalHost, M::Id),
        (C::Instance, R::AttachedTo) => rule(C::Volume, M::Id),
        (C::Volume, R::AttachedTo) => rule(C::Instance, M::Id),
        (C::Snapshot, R::SnapshotOf) => rule(C::Volume, M::Id),
        (C::ClusterNode, R::ProvisionedBy) => rule(C::Instance, M::Id),
        (C::Pod, R::RunsOn) => rule(C::ClusterNode, M::Name),
        (C::Pod, R::UsesPvc) => rule(C::PersistentVolumeClaim, M::Name),
        (C::Pod, R::HasPd) => rule(C::PdIndicator, M::Id),
        (C::PersistentVolumeClaim, R::BindsTo) => rule(C::PersistentVolume, M::Name),
        (C::PersistentVolume, R::StoredOn) => rule(C::Volume, M::Id),
        _ => None,
    }
}
