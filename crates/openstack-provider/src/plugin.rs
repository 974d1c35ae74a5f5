//! OpenStack 프로바이더 플러그인
//!
//! core의 [`Plugin`] 계약을 구현합니다. `initialize`에서 엔드포인트
//! 검증과 Keystone 인증을 수행하고, `fetch_data`에서 프로젝트/인스턴스/
//! 볼륨/스냅샷 스냅샷을 `os_*` 키로 수집합니다.

use glassbox_core::config::ProviderConfig;
use glassbox_core::error::{GlassboxError, PluginError};
use glassbox_core::model::RawData;
use glassbox_core::plugin::Plugin;

use crate::client::OpenStackClient;

/// 플러그인 생성자 레지스트리에서 사용하는 프로바이더 이름
pub const PROVIDER_NAME: &str = "openstack";

/// OpenStack 프로바이더 플러그인
///
/// 호출 간에 유지하는 가변 상태는 인증된 클라이언트뿐입니다.
#[derive(Debug, Default)]
pub struct OpenStackPlugin {
    client: Option<OpenStackClient>,
}

impl OpenStackPlugin {
    /// 초기화 전 상태의 플러그인을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Plugin for OpenStackPlugin {
    async fn initialize(&mut self, config: &ProviderConfig) -> Result<(), GlassboxError> {
        let client = OpenStackClient::connect(&config.api_access, &config.credentials)
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

        let fetch_failed = |e: crate::error::OpenStackError| PluginError::FetchFailed {
            name: PROVIDER_NAME.to_owned(),
            reason: e.to_string(),
        };

        let projects = client.list_projects().await.map_err(fetch_failed)?;
        let servers = client.list_servers().await.map_err(fetch_failed)?;
        let volumes = client.list_volumes().await.map_err(fetch_failed)?;
        let snapshots = client.list_snapshots().await.map_err(fetch_failed)?;

        tracing::debug!(
            projects = projects.len(),
            servers = servers.len(),
            volumes = volumes.len(),
            snapshots = snapshots.len(),
            "openstack snapshot fetched"
        );

        let mut raw = RawData::new();
        raw.push("os_project", projects);
        raw.push("os_instance", servers);
        raw.push("os_volume", volumes);
        raw.push("os_snapshot", snapshots);
        Ok(raw)
    }
}
