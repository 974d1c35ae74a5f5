//! 쿠버네티스 프로바이더 플러그인
//!
//! `fetch_data`는 `k8s_pv`, `k8s_node`, `k8s_pod`를 **이 순서로**
//! `RawData`에 넣습니다. 변환기의 PVC→PV 스크래치 맵이 `k8s_pv`에서
//! 만들어져 `k8s_pod`에서 소비되기 때문에 순서가 계약의 일부입니다.

use glassbox_core::config::ProviderConfig;
use glassbox_core::error::{GlassboxError, PluginError};
use glassbox_core::model::RawData;
use glassbox_core::plugin::Plugin;

use crate::client::KubernetesClient;

/// 플러그인 생성자 레지스트리에서 사용하는 프로바이더 이름
pub const PROVIDER_NAME: &str = "kubernetes";

/// 쿠버네티스 프로바이더 플러그인
#[derive(Debug, Default)]
pub struct KubernetesPlugin {
    client: Option<KubernetesClient>,
}

impl KubernetesPlugin {
    /// 초기화 전 상태의 플러그인을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Plugin for KubernetesPlugin {
    async fn initialize(&mut self, config: &ProviderConfig) -> Result<(), GlassboxError> {
        let client = KubernetesClient::connect(&config.api_access, &config.credentials)
            .await
            .map_err(|e| PluginError::InitFailed {
                name: PROVIDER_NAME.to_owned(),
                reason: e.to_string(),
            })?;
        self.client = Some(client);
        Ok(())
    }

    async fn fetch_data(&self) -> Result<RawData, GlassboxError> {
        let client = self.client.as_ref().ok_or_else(|| PluginError::FetchFailed {
            name: PROVIDER_NAME.to_owned(),
            reason: "plugin not initialized".to_owned(),
        })?;

        let fetch_failed = |e: crate::error::KubernetesError| PluginError::FetchFailed {
            name: PROVIDER_NAME.to_owned(),
            reason: e.to_string(),
        };

        let pvs = client.list_persistent_volumes().await.map_err(fetch_failed)?;
        let nodes = client.list_nodes().await.map_err(fetch_failed)?;
        let pods = client.list_pods().await.map_err(fetch_failed)?;

        tracing::debug!(
            persistent_volumes = pvs.len(),
            nodes = nodes.len(),
            pods = pods.len(),
            "kubernetes snapshot fetched"
        );

        // k8s_pv가 k8s_pod보다 먼저 디스패치되어야 한다.
        let mut raw = RawData::new();
        raw.push("k8s_pv", pvs);
        raw.push("k8s_node", nodes);
        raw.push("k8s_pod", pods);
        Ok(raw)
    }
}
