//! OpenStack 변환기 — `os_*` 원시 레코드를 중립 컴포넌트로 매핑
//!
//! 키별 핸들러:
//! - `os_project`: 프로젝트. 변환 시점 관계 없음.
//! - `os_instance`: 인스턴스 + 동반 물리 호스트(호스트 ID 기준 중복 제거).
//! - `os_volume`: 볼륨. 첫 번째 첨부의 서버로 `ATTACHED_TO` 하나.
//! - `os_snapshot`: 스냅샷. `SNAPSHOT_OF` → 원본 볼륨.
//!
//! 디코딩에 실패한 개별 레코드는 경고 후 건너뜁니다. 나머지 레코드는
//! 계속 처리됩니다.

use std::collections::HashSet;

use serde_json::{json, Value};

use glassbox_core::error::TransformError;
use glassbox_core::model::{Component, ComponentType, Relationship, RelationshipType};
use glassbox_core::transform::Transformer;

use crate::models::{Project, Server, Snapshot, Volume};

/// OpenStack 변환기
///
/// 틱 간 상태가 없습니다. 물리 호스트 중복 제거는 핸들러 호출
/// 범위(= `os_instance` 엔트리 하나) 안에서만 유지됩니다.
#[derive(Debug, Default)]
pub struct OpenStackTransformer;

impl OpenStackTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for OpenStackTransformer {
    fn transform(&mut self, key: &str, items: &[Value]) -> Result<Vec<Component>, TransformError> {
        match key {
            "os_project" => Ok(handle_project(items)),
            "os_instance" => Ok(handle_compute(items)),
            "os_volume" => Ok(handle_volume(items)),
            "os_snapshot" => Ok(handle_snapshot(items)),
            _ => Err(TransformError::UnknownKey {
                key: key.to_owned(),
            }),
        }
    }
}

fn handle_project(items: &[Value]) -> Vec<Component> {
    let mut components = Vec::new();
    for item in items {
        let project: Project = match serde_json::from_value(item.clone()) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable project record");
                continue;
            }
        };

        let mut component = Component::new(&project.id, &project.name, ComponentType::Project);
        component.metadata.insert(
            "description".to_owned(),
            json!(project.description.unwrap_or_default()),
        );
        component
            .metadata
            .insert("enabled".to_owned(), json!(project.enabled));
        components.push(component);
    }
    components
}

fn handle_compute(items: &[Value]) -> Vec<Component> {
    let mut components = Vec::new();
    let mut seen_hosts: HashSet<String> = HashSet::new();

    for item in items {
        let server: Server = match serde_json::from_value(item.clone()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable server record");
                continue;
            }
        };

        let volume_ids: Vec<String> =
            server.volumes_attached.iter().map(|v| v.id.clone()).collect();

        let mut relationships = vec![
            Relationship::new(RelationshipType::BelongsTo, &server.tenant_id),
            Relationship::new(RelationshipType::AssignedHost, &server.host_id),
        ];
        for volume_id in &volume_ids {
            relationships.push(Relationship::new(RelationshipType::AttachedTo, volume_id));
        }

        // 같은 엔트리 안에서 호스트는 한 번만 방출한다.
        if seen_hosts.insert(server.host_id.clone()) {
            let mut host =
                Component::new(&server.host_id, &server.host_id, ComponentType::PhysicalHost);
            host.availability_zone = server.availability_zone.clone();
            components.push(host);
        }

        let mut component = Component::new(&server.id, &server.name, ComponentType::Instance);
        component.availability_zone = server.availability_zone.clone();
        component.metadata.insert("status".to_owned(), json!(server.status));
        component
            .metadata
            .insert("tenantID".to_owned(), json!(server.tenant_id));
        component
            .metadata
            .insert("userID".to_owned(), json!(server.user_id));
        component
            .metadata
            .insert("hostID".to_owned(), json!(server.host_id));
        component
            .metadata
            .insert("created".to_owned(), json!(server.created));
        component
            .metadata
            .insert("updated".to_owned(), json!(server.updated));
        component
            .metadata
            .insert("volumesAttached".to_owned(), json!(volume_ids));
        component.relationships = relationships;
        components.push(component);
    }
    components
}

fn handle_volume(items: &[Value]) -> Vec<Component> {
    let mut components = Vec::new();
    for item in items {
        let volume: Volume = match serde_json::from_value(item.clone()) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable volume record");
                continue;
            }
        };
        components.push(volume_to_component(volume));
    }
    components
}

fn volume_to_component(volume: Volume) -> Component {
    let mut component = Component::new(
        &volume.id,
        volume.name.clone().unwrap_or_default(),
        ComponentType::Volume,
    );
    component.availability_zone = volume.availability_zone.clone();
    let metadata = &mut component.metadata;

    // 첫 번째 첨부만 기록한다. 나머지 첨부는 버려진다.
    let mut instance_id = String::new();
    if let Some(attachment) = volume.attachments.first() {
        instance_id = attachment.server_id.clone();
        metadata.insert("attachedAt".to_owned(), json!(attachment.attached_at));
        metadata.insert("attachmentID".to_owned(), json!(attachment.attachment_id));
        metadata.insert("device".to_owned(), json!(attachment.device));
        metadata.insert(
            "hostName".to_owned(),
            json!(attachment.host_name.clone().unwrap_or_default()),
        );
        metadata.insert(
            "attachmentVolumeID".to_owned(),
            json!(attachment.volume_id),
        );
    }

    metadata.insert("bootable".to_owned(), json!(volume.bootable));
    metadata.insert(
        "description".to_owned(),
        json!(volume.description.unwrap_or_default()),
    );
    metadata.insert("encrypted".to_owned(), json!(volume.encrypted));
    metadata.insert("metadata".to_owned(), Value::Object(volume.metadata));
    metadata.insert("multiattach".to_owned(), json!(volume.multiattach));
    metadata.insert(
        "replicationStatus".to_owned(),
        json!(volume.replication_status.unwrap_or_default()),
    );
    metadata.insert("size".to_owned(), json!(volume.size));
    // 원본 스냅샷이 없으면 문자열 필드에 불리언 `false`를 기록한다.
    // 다운스트림 소비자가 의존하는 와이어 계약이다.
    match volume.snapshot_id {
        Some(ref id) if !id.is_empty() => {
            metadata.insert("snapshotID".to_owned(), json!(id));
        }
        _ => {
            metadata.insert("snapshotID".to_owned(), json!(false));
        }
    }
    metadata.insert(
        "sourceVolid".to_owned(),
        json!(volume.source_volid.unwrap_or_default()),
    );
    metadata.insert("status".to_owned(), json!(volume.status));
    metadata.insert("userID".to_owned(), json!(volume.user_id));
    metadata.insert(
        "volumeType".to_owned(),
        json!(volume.volume_type.unwrap_or_default()),
    );

    component
        .relationships
        .push(Relationship::new(RelationshipType::AttachedTo, instance_id));
    component
}

fn handle_snapshot(items: &[Value]) -> Vec<Component> {
    let mut components = Vec::new();
    for item in items {
        let snapshot: Snapshot = match serde_json::from_value(item.clone()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable snapshot record");
                continue;
            }
        };

        let mut component = Component::new(
            &snapshot.id,
            snapshot.name.clone().unwrap_or_default(),
            ComponentType::Snapshot,
        );
        let metadata = &mut component.metadata;
        metadata.insert("status".to_owned(), json!(snapshot.status));
        metadata.insert("size".to_owned(), json!(snapshot.size));
        metadata.insert("createdAt".to_owned(), json!(snapshot.created_at));
        metadata.insert(
            "updatedAt".to_owned(),
            json!(snapshot.updated_at.unwrap_or_default()),
        );
        metadata.insert(
            "description".to_owned(),
            json!(snapshot.description.unwrap_or_default()),
        );
        metadata.insert("userID".to_owned(), json!(snapshot.user_id));
        metadata.insert(
            "groupSnapshotID".to_owned(),
            json!(snapshot.group_snapshot_id.unwrap_or_default()),
        );
        component.relationships.push(Relationship::new(
            RelationshipType::SnapshotOf,
            snapshot.volume_id,
        ));
        components.push(component);
    }
    components
}
