//! OpenStack API 응답 모델 (필요한 부분집합)
//!
//! 느슨하게 타이핑된 원시 레코드는 각 변환기 핸들러 안에서
//! 이 타입들로 디코딩됩니다. 필드가 빠진 응답도 허용하도록
//! 전반적으로 `#[serde(default)]`를 사용합니다.

use serde::Deserialize;

/// Keystone 프로젝트
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: bool,
}

/// Nova 서버 (인스턴스)
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "hostId", default)]
    pub host_id: String,
    #[serde(rename = "OS-EXT-AZ:availability_zone", default)]
    pub availability_zone: Option<String>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
    #[serde(rename = "os-extended-volumes:volumes_attached", default)]
    pub volumes_attached: Vec<AttachedVolumeRef>,
}

/// 서버에 붙은 볼륨 참조
#[derive(Debug, Clone, Deserialize)]
pub struct AttachedVolumeRef {
    pub id: String,
}

/// Cinder 볼륨
#[derive(Debug, Clone, Deserialize)]
pub struct Volume {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub availability_zone: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub size: i64,
    /// Cinder는 불리언이 아니라 "true"/"false" 문자열을 반환한다.
    #[serde(default)]
    pub bootable: String,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default)]
    pub multiattach: bool,
    #[serde(default)]
    pub snapshot_id: Option<String>,
    #[serde(default)]
    pub source_volid: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub replication_status: Option<String>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub volume_type: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub attachments: Vec<VolumeAttachment>,
}

/// 볼륨 첨부 정보
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeAttachment {
    #[serde(default)]
    pub server_id: String,
    #[serde(default)]
    pub attachment_id: String,
    #[serde(default)]
    pub attached_at: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub volume_id: String,
}

/// Cinder 스냅샷
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub volume_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub group_snapshot_id: Option<String>,
}
