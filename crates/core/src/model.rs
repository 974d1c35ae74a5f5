//! 중립 모델 — 변환기와 그래프 라이터 사이의 공통 어휘
//!
//! 프로바이더마다 제각각인 응답을 [`Component`] / [`Relationship`] 으로
//! 정규화하여 하나의 스냅샷 그래프로 기록할 수 있게 합니다.
//! [`RawData`]는 플러그인이 변환기에 넘기는 키 기반 원시 레코드 묶음입니다.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 컴포넌트 유형 (닫힌 집합)
///
/// 그래프 저장소의 노드 레이블과 1:1로 대응합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    /// 테넌트/프로젝트
    Project,
    /// 컴퓨트 인스턴스 (VM)
    Instance,
    /// 블록 스토리지 볼륨
    Volume,
    /// 볼륨 스냅샷
    Snapshot,
    /// 쿠버네티스 클러스터 노드
    ClusterNode,
    /// 쿠버네티스 파드
    Pod,
    /// 물리 호스트
    PhysicalHost,
    /// 퍼시스턴트 볼륨
    PersistentVolume,
    /// 퍼시스턴트 볼륨 클레임
    PersistentVolumeClaim,
    /// 개인정보 처리 선언 지표
    PdIndicator,
    /// 개인정보 카테고리
    DataCategory,
    /// 스캔 버전 메타데이터
    Metadata,
}

impl ComponentType {
    /// 그래프 저장소에서 사용하는 노드 레이블 문자열
    pub fn label(&self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Instance => "Instance",
            Self::Volume => "Volume",
            Self::Snapshot => "Snapshot",
            Self::ClusterNode => "ClusterNode",
            Self::Pod => "Pod",
            Self::PhysicalHost => "PhysicalHost",
            Self::PersistentVolume => "PersistentVolume",
            Self::PersistentVolumeClaim => "PersistentVolumeClaim",
            Self::PdIndicator => "PDIndicator",
            Self::DataCategory => "DataCategory",
            Self::Metadata => "Metadata",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 관계 유형 (닫힌 집합)
///
/// 그래프 저장소의 관계 타입과 1:1로 대응합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    /// Instance → Project
    BelongsTo,
    /// Instance → PhysicalHost
    AssignedHost,
    /// Volume ↔ Instance (양방향으로 각각 방출)
    AttachedTo,
    /// Snapshot → Volume
    SnapshotOf,
    /// ClusterNode → Instance (system UUID 매칭)
    ProvisionedBy,
    /// Pod → ClusterNode (노드 이름 매칭)
    RunsOn,
    /// Pod → PersistentVolumeClaim
    UsesPvc,
    /// PersistentVolumeClaim → PersistentVolume
    BindsTo,
    /// PersistentVolume → Volume
    StoredOn,
    /// Pod → PDIndicator
    HasPd,
    /// PDIndicator → DataCategory
    HasCategory,
    /// Metadata → Project
    Scanned,
    /// Metadata → Metadata (버전 체인)
    NextVersion,
}

impl RelationshipType {
    /// 그래프 저장소에서 사용하는 관계 타입 문자열
    pub fn name(&self) -> &'static str {
        match self {
            Self::BelongsTo => "BELONGS_TO",
            Self::AssignedHost => "ASSIGNED_HOST",
            Self::AttachedTo => "ATTACHED_TO",
            Self::SnapshotOf => "SNAPSHOT_OF",
            Self::ProvisionedBy => "PROVISIONED_BY",
            Self::RunsOn => "RUNS_ON",
            Self::UsesPvc => "USES_PVC",
            Self::BindsTo => "BINDS_TO",
            Self::StoredOn => "STORED_ON",
            Self::HasPd => "HAS_PD",
            Self::HasCategory => "HAS_CATEGORY",
            Self::Scanned => "SCANNED",
            Self::NextVersion => "NEXT_VERSION",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 변환기가 방출하는 방향성 간선
///
/// `target`은 상대 끝점의 프로바이더 ID(또는 관계 유형에 따라 이름)이며,
/// 실제 그래프 간선은 라이터가 `(레이블, 매칭 필드, 버전)` 기준으로
/// 기록 시점에 해석합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// 관계 유형
    pub relationship_type: RelationshipType,
    /// 상대 끝점 식별자
    pub target: String,
}

impl Relationship {
    pub fn new(relationship_type: RelationshipType, target: impl Into<String>) -> Self {
        Self {
            relationship_type,
            target: target.into(),
        }
    }
}

/// 변환기가 방출하는 중립 컴포넌트
///
/// 한 번의 스캔 틱 동안 생성되어 그래프에 기록된 뒤 폐기됩니다.
/// `id`는 프로바이더가 부여한 식별자로, 프로바이더 안에서는 안정적입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// 프로바이더 부여 식별자
    pub id: String,
    /// 표시 이름
    pub name: String,
    /// 컴포넌트 유형
    pub component_type: ComponentType,
    /// 가용 영역 (없을 수 있음)
    pub availability_zone: Option<String>,
    /// 유형별 자유 형식 메타데이터
    pub metadata: serde_json::Map<String, Value>,
    /// 방출 순서가 보존되는 아웃바운드 간선 목록
    pub relationships: Vec<Relationship>,
}

impl Component {
    /// 메타데이터와 관계가 비어 있는 컴포넌트를 생성합니다.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        component_type: ComponentType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            component_type,
            availability_zone: None,
            metadata: serde_json::Map::new(),
            relationships: Vec::new(),
        }
    }

    /// 메타데이터 값을 조회합니다.
    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({} id={})",
            self.component_type, self.name, self.id,
        )
    }
}

/// 플러그인이 변환기에 넘기는 키 기반 원시 레코드 묶음
///
/// 키는 `<접두사>_<종류>` 형태입니다 (예: `os_instance`, `k8s_pod`).
/// 접두사가 변환기를 선택하고, 전체 키가 변환기 내부 핸들러를 선택합니다.
///
/// 삽입 순서가 보존됩니다. 쿠버네티스 변환기는 `k8s_pv`를 `k8s_pod`보다
/// 먼저 소비해야 하므로, 플러그인은 키를 그 순서로 넣어야 합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawData {
    entries: Vec<(String, Vec<Value>)>,
}

impl RawData {
    /// 빈 묶음을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 키 하나를 레코드 목록과 함께 추가합니다.
    ///
    /// 같은 키를 두 번 넣으면 두 엔트리가 모두 유지됩니다.
    /// 중복 제거는 플러그인의 책임입니다.
    pub fn push(&mut self, key: impl Into<String>, items: Vec<Value>) {
        self.entries.push((key.into(), items));
    }

    /// 삽입 순서대로 (키, 레코드 목록)을 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// 키로 레코드 목록을 조회합니다 (첫 번째 일치 엔트리).
    pub fn get(&self, key: &str) -> Option<&[Value]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// 엔트리 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 엔트리가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
