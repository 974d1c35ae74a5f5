//! 쿠버네티스 변환기 — `k8s_*` 원시 레코드를 중립 컴포넌트로 매핑
//!
//! 키별 핸들러:
//! - `k8s_pv`: PVC 이름 → PV 이름 스크래치 맵을 새로 만들고,
//!   PV 컴포넌트를 `STORED_ON` → 기반 Cinder 볼륨과 함께 방출.
//! - `k8s_node`: 클러스터 노드. `PROVISIONED_BY` → system UUID
//!   (해당 노드를 실행하는 OpenStack 인스턴스 ID와 일치).
//! - `k8s_pod`: 파드. 처음 보는 PVC마다 PVC 컴포넌트를 방출하고
//!   (`BINDS_TO` → 스크래치 맵의 PV), 파드에 `USES_PVC` / `RUNS_ON`을
//!   추가. `has_pd` 어노테이션이 유효한 JSON이면 PDIndicator를 방출.
//!
//! 스크래치 맵은 틱 내부 상태입니다. 디스패처가 틱 시작마다
//! [`begin_tick`](glassbox_core::transform::Transformer::begin_tick)으로
//! 비우므로, `k8s_pv`가 없는 틱이 이전 틱의 맵에 바인딩하는 일은
//! 없습니다.

use std::collections::{HashMap, HashSet};

use serde_json::{json, Value};

use glassbox_core::error::TransformError;
use glassbox_core::model::{Component, ComponentType, Relationship, RelationshipType};
use glassbox_core::transform::Transformer;

use crate::models::{Node, PersistentVolume, Pod};

/// PDIndicator 어노테이션 키
pub const PD_ANNOTATION: &str = "has_pd";

/// PDIndicator 컴포넌트 ID 접두사
const PD_ID_PREFIX: &str = "pd_indicator_";

/// 쿠버네티스 변환기
///
/// `pvc_to_pv`는 `k8s_pv` 핸들러가 만들고 `k8s_pod` 핸들러가 소비하는
/// 틱 내부 스크래치 상태입니다.
#[derive(Debug, Default)]
pub struct KubernetesTransformer {
    pvc_to_pv: HashMap<String, String>,
}

impl KubernetesTransformer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transformer for KubernetesTransformer {
    fn begin_tick(&mut self) {
        self.pvc_to_pv.clear();
    }

    fn transform(&mut self, key: &str, items: &[Value]) -> Result<Vec<Component>, TransformError> {
        match key {
            "k8s_pv" => {
                self.pvc_to_pv = build_pvc_to_pv_map(items);
                Ok(handle_pv(items))
            }
            "k8s_node" => Ok(handle_node(items)),
            "k8s_pod" => Ok(handle_pod(items, &self.pvc_to_pv)),
            _ => Err(TransformError::UnknownKey {
                key: key.to_owned(),
            }),
        }
    }
}

fn build_pvc_to_pv_map(items: &[Value]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for item in items {
        let Ok(pv) = serde_json::from_value::<PersistentVolume>(item.clone()) else {
            continue;
        };
        if let Some(claim_ref) = pv.spec.claim_ref {
            if !claim_ref.name.is_empty() {
                map.insert(claim_ref.name, pv.metadata.name);
            }
        }
    }
    map
}

fn handle_pv(items: &[Value]) -> Vec<Component> {
    let mut components = Vec::new();
    for item in items {
        let pv: PersistentVolume = match serde_json::from_value(item.clone()) {
            Ok(pv) => pv,
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable persistent volume record");
                continue;
            }
        };

        let mut component = Component::new(
            &pv.metadata.uid,
            &pv.metadata.name,
            ComponentType::PersistentVolume,
        );
        component.metadata.insert(
            "createdAt".to_owned(),
            json!(pv.metadata.creation_timestamp.clone().unwrap_or_default()),
        );

        // Cinder 소스가 없는 PV는 기반 볼륨 간선 없이 방출한다.
        if let Some(cinder) = pv.spec.cinder {
            component.relationships.push(Relationship::new(
                RelationshipType::StoredOn,
                cinder.volume_id,
            ));
        }
        components.push(component);
    }
    components
}

fn handle_node(items: &[Value]) -> Vec<Component> {
    let mut components = Vec::new();
    for item in items {
        let node: Node = match serde_json::from_value(item.clone()) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable node record");
                continue;
            }
        };

        let mut component = Component::new(
            &node.metadata.uid,
            &node.metadata.name,
            ComponentType::ClusterNode,
        );
        component.metadata.insert(
            "createdAt".to_owned(),
            json!(node.metadata.creation_timestamp.clone().unwrap_or_default()),
        );
        component.relationships.push(Relationship::new(
            RelationshipType::ProvisionedBy,
            node.status.node_info.system_uuid,
        ));
        components.push(component);
    }
    components
}

fn handle_pod(items: &[Value], pvc_to_pv: &HashMap<String, String>) -> Vec<Component> {
    let mut components = Vec::new();
    let mut seen_pvcs: HashSet<String> = HashSet::new();

    for item in items {
        let pod: Pod = match serde_json::from_value(item.clone()) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable pod record");
                continue;
            }
        };

        let mut volume_names = Vec::new();
        let mut pod_relationships = vec![Relationship::new(
            RelationshipType::RunsOn,
            &pod.spec.node_name,
        )];

        for volume in &pod.spec.volumes {
            volume_names.push(volume.name.clone());

            let Some(pvc_ref) = &volume.persistent_volume_claim else {
                continue;
            };
            let pvc_name = &pvc_ref.claim_name;

            // 같은 틱 안에서 PVC는 처음 보일 때 한 번만 방출한다.
            if let Some(pv_name) = pvc_to_pv.get(pvc_name) {
                if seen_pvcs.insert(pvc_name.clone()) {
                    let mut pvc = Component::new(
                        pvc_name,
                        pvc_name,
                        ComponentType::PersistentVolumeClaim,
                    );
                    pvc.relationships
                        .push(Relationship::new(RelationshipType::BindsTo, pv_name));
                    components.push(pvc);
                }
            }

            pod_relationships.push(Relationship::new(RelationshipType::UsesPvc, pvc_name));
        }

        let mut pod_component =
            Component::new(&pod.metadata.uid, &pod.metadata.name, ComponentType::Pod);
        pod_component.metadata.insert(
            "createdAt".to_owned(),
            json!(pod.metadata.creation_timestamp.clone().unwrap_or_default()),
        );
        pod_component
            .metadata
            .insert("volumes".to_owned(), json!(volume_names));
        pod_component.relationships = pod_relationships;

        if let Some(annotation) = pod.metadata.annotations.get(PD_ANNOTATION) {
            match pd_indicator_from_annotation(&pod, annotation) {
                Some(pd_component) => {
                    pod_component.relationships.push(Relationship::new(
                        RelationshipType::HasPd,
                        pd_component.id.clone(),
                    ));
                    components.push(pd_component);
                }
                None => {
                    tracing::warn!(
                        pod = %pod.metadata.name,
                        "invalid JSON in has_pd annotation, skipping pd indicator"
                    );
                }
            }
        }

        components.push(pod_component);
    }
    components
}

/// `has_pd` 어노테이션에서 PDIndicator 컴포넌트를 만듭니다.
///
/// 어노테이션 값이 유효한 JSON이 아니면 `None`을 반환합니다.
/// 파드 자체는 여전히 방출됩니다.
fn pd_indicator_from_annotation(pod: &Pod, annotation: &str) -> Option<Component> {
    let parsed: Value = serde_json::from_str(annotation).ok()?;
    // 검증된 JSON을 정규화된 문자열로 다시 직렬화해 메타데이터에 싣는다.
    let normalized = serde_json::to_string(&parsed).ok()?;

    let mut component = Component::new(
        format!("{PD_ID_PREFIX}{}", pod.metadata.uid),
        format!("{PD_ID_PREFIX}{}", pod.metadata.name),
        ComponentType::PdIndicator,
    );
    component
        .metadata
        .insert(PD_ANNOTATION.to_owned(), json!(normalized));
    Some(component)
}
