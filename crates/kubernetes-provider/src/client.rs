//! 쿠버네티스 API 서버 클라이언트
//!
//! 서비스 계정 베어러 토큰으로 REST 엔드포인트를 직접 호출합니다.
//! 초기화 시 `/version` 프로브로 토큰과 연결을 검증합니다.

use serde_json::Value;

use glassbox_core::config::{ProviderCredentials, ServiceEndpoints};

use crate::error::KubernetesError;

/// 인증된 쿠버네티스 API 클라이언트
#[derive(Debug)]
pub struct KubernetesClient {
    http: reqwest::Client,
    cluster_api: String,
    bearer_token: String,
}

impl KubernetesClient {
    /// 엔드포인트/토큰을 검증하고 API 서버를 프로브합니다.
    pub async fn connect(
        endpoints: &ServiceEndpoints,
        credentials: &ProviderCredentials,
    ) -> Result<Self, KubernetesError> {
        let cluster_api = endpoints
            .cluster_api
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(KubernetesError::MissingEndpoint {
                name: "cluster_api",
            })?
            .trim_end_matches('/')
            .to_owned();

        let bearer_token = credentials
            .bearer_token
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(KubernetesError::MissingCredential {
                name: "bearer_token",
            })?
            .to_owned();

        let client = Self {
            http: reqwest::Client::new(),
            cluster_api,
            bearer_token,
        };
        client.probe().await?;
        Ok(client)
    }

    /// `/version`으로 연결과 토큰을 검증합니다.
    async fn probe(&self) -> Result<(), KubernetesError> {
        let url = format!("{}/version", self.cluster_api);
        let response = self.http.get(&url).bearer_auth(&self.bearer_token).send().await?;
        if !response.status().is_success() {
            return Err(KubernetesError::Probe(format!(
                "{url} returned {}",
                response.status()
            )));
        }
        tracing::debug!(cluster_api = %self.cluster_api, "api server probe succeeded");
        Ok(())
    }

    /// PersistentVolume 목록을 조회합니다.
    pub async fn list_persistent_volumes(&self) -> Result<Vec<Value>, KubernetesError> {
        self.list("/api/v1/persistentvolumes").await
    }

    /// 노드 목록을 조회합니다.
    pub async fn list_nodes(&self) -> Result<Vec<Value>, KubernetesError> {
        self.list("/api/v1/nodes").await
    }

    /// 전체 네임스페이스의 파드 목록을 조회합니다.
    pub async fn list_pods(&self) -> Result<Vec<Value>, KubernetesError> {
        self.list("/api/v1/pods").await
    }

    async fn list(&self, path: &'static str) -> Result<Vec<Value>, KubernetesError> {
        let url = format!("{}{}", self.cluster_api, path);
        let body: Value = self
            .http
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match body.get("items").and_then(Value::as_array) {
            Some(items) => Ok(items.clone()),
            None => Err(KubernetesError::UnexpectedPayload {
                endpoint: path,
                reason: "missing 'items' array".to_owned(),
            }),
        }
    }
}
