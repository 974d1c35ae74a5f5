//! Canned provider snapshots for E2E scenarios.

use serde_json::json;

use glassbox_core::model::RawData;

/// Minimal OpenStack tenant: one project, one instance on one host,
/// one volume attached to the instance.
pub fn openstack_fixture() -> RawData {
    let mut raw = RawData::new();
    raw.push(
        "os_project",
        vec![json!({"id": "P1", "name": "tenant-1", "description": "test tenant", "enabled": true})],
    );
    raw.push(
        "os_instance",
        vec![json!({
            "id": "I1",
            "name": "web-1",
            "status": "ACTIVE",
            "tenant_id": "P1",
            "user_id": "u-1",
            "hostId": "H1",
            "OS-EXT-AZ:availability_zone": "nova",
            "created": "2024-03-01T10:00:00Z",
            "updated": "2024-03-02T10:00:00Z",
            "os-extended-volumes:volumes_attached": [{"id": "V1"}],
        })],
    );
    raw.push(
        "os_volume",
        vec![json!({
            "id": "V1",
            "name": "data-1",
            "status": "in-use",
            "size": 20,
            "bootable": "false",
            "encrypted": false,
            "multiattach": false,
            "attachments": [{"server_id": "I1", "device": "/dev/vdb"}],
        })],
    );
    raw.push("os_snapshot", vec![]);
    raw
}

/// Minimal Kubernetes cluster on top of the OpenStack fixture: one node
/// backed by instance `I1`, one PV on volume `V1` claimed by `C1`, and
/// one pod using the claim and declaring a personal-data category.
pub fn kubernetes_fixture() -> RawData {
    let mut raw = RawData::new();
    raw.push(
        "k8s_pv",
        vec![json!({
            "metadata": {"uid": "pv-uid-1", "name": "PV1",
                         "creationTimestamp": "2024-03-01T00:00:00Z"},
            "spec": {"claimRef": {"name": "C1"}, "cinder": {"volumeID": "V1"}},
        })],
    );
    raw.push(
        "k8s_node",
        vec![json!({
            "metadata": {"uid": "node-uid-1", "name": "N",
                         "creationTimestamp": "2024-03-01T00:00:00Z"},
            "status": {"nodeInfo": {"systemUUID": "I1"}},
        })],
    );
    raw.push(
        "k8s_pod",
        vec![json!({
            "metadata": {
                "uid": "pod-uid-1",
                "name": "POD1",
                "creationTimestamp": "2024-03-01T00:00:00Z",
                "annotations": {
                    "has_pd": "{\"dataCategories\":[{\"name\":\"X\",\"purpose\":\"p\",\"legalBasis\":\"l\",\"storage\":\"s\"}]}"
                },
            },
            "spec": {
                "nodeName": "N",
                "volumes": [{"name": "vol-c1", "persistentVolumeClaim": {"claimName": "C1"}}],
            },
        })],
    );
    raw
}
