//! 쿠버네티스 API 리소스 모델 (필요한 부분집합)
//!
//! API 서버의 camelCase 필드를 serde rename으로 받습니다.
//! 변환기 핸들러 안에서만 디코딩됩니다.

use std::collections::BTreeMap;

use serde::Deserialize;

/// 공통 오브젝트 메타데이터
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "creationTimestamp", default)]
    pub creation_timestamp: Option<String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

/// PersistentVolume
#[derive(Debug, Clone, Deserialize)]
pub struct PersistentVolume {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PersistentVolumeSpec,
}

/// PersistentVolume 스펙 (클레임 참조와 Cinder 소스만)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersistentVolumeSpec {
    #[serde(rename = "claimRef", default)]
    pub claim_ref: Option<ClaimRef>,
    #[serde(default)]
    pub cinder: Option<CinderSource>,
}

/// PV가 바인딩된 클레임 참조
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimRef {
    #[serde(default)]
    pub name: String,
}

/// Cinder 볼륨 소스
#[derive(Debug, Clone, Deserialize)]
pub struct CinderSource {
    #[serde(rename = "volumeID", default)]
    pub volume_id: String,
}

/// 클러스터 노드
#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: NodeStatus,
}

/// 노드 상태 (노드 정보만)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeStatus {
    #[serde(rename = "nodeInfo", default)]
    pub node_info: NodeInfo,
}

/// 노드 시스템 정보
///
/// `system_uuid`는 이 노드를 실행하는 OpenStack 인스턴스의 ID와
/// 일치합니다 (`PROVISIONED_BY` 매칭 키).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeInfo {
    #[serde(rename = "systemUUID", default)]
    pub system_uuid: String,
}

/// 파드
#[derive(Debug, Clone, Deserialize)]
pub struct Pod {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PodSpec,
}

/// 파드 스펙 (노드 배치와 볼륨만)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodSpec {
    #[serde(rename = "nodeName", default)]
    pub node_name: String,
    #[serde(default)]
    pub volumes: Vec<PodVolume>,
}

/// 파드 볼륨
#[derive(Debug, Clone, Deserialize)]
pub struct PodVolume {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "persistentVolumeClaim", default)]
    pub persistent_volume_claim: Option<PvcReference>,
}

/// 파드가 참조하는 PVC
#[derive(Debug, Clone, Deserialize)]
pub struct PvcReference {
    #[serde(rename = "claimName", default)]
    pub claim_name: String,
}
