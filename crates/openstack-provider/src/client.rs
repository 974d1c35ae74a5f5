//! OpenStack API 클라이언트
//!
//! Keystone 애플리케이션 자격 증명으로 토큰을 발급받고,
//! 이후 모든 목록 조회에 `X-Auth-Token` 헤더를 사용합니다.
//! 토큰은 초기화 시 한 번 발급되며, 만료 시 다음 프로세스 재시작
//! 전까지는 수집 실패로 나타납니다 (틱 단위 실패 격리에 맡긴다).

use serde_json::{json, Value};

use glassbox_core::config::{ProviderCredentials, ServiceEndpoints};

use crate::error::OpenStackError;

const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// 인증된 OpenStack API 클라이언트
#[derive(Debug)]
pub struct OpenStackClient {
    http: reqwest::Client,
    identity_api: String,
    compute_api: String,
    block_storage_api: String,
    token: String,
}

impl OpenStackClient {
    /// 엔드포인트를 검증하고 Keystone 인증을 수행합니다.
    pub async fn connect(
        endpoints: &ServiceEndpoints,
        credentials: &ProviderCredentials,
    ) -> Result<Self, OpenStackError> {
        let identity_api = required_endpoint(&endpoints.identity_api, "identity_api")?;
        let compute_api = required_endpoint(&endpoints.compute_api, "compute_api")?;
        let block_storage_api =
            required_endpoint(&endpoints.block_storage_api, "block_storage_api")?;

        let credential_id = credentials
            .app_credentials_id
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(OpenStackError::MissingCredential {
                name: "app_credentials_id",
            })?;
        let credential_secret = credentials
            .app_credentials_secret
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(OpenStackError::MissingCredential {
                name: "app_credentials_secret",
            })?;

        let http = reqwest::Client::new();
        let token =
            authenticate(&http, &identity_api, credential_id, credential_secret).await?;

        tracing::debug!(identity_api = %identity_api, "keystone token issued");

        Ok(Self {
            http,
            identity_api,
            compute_api,
            block_storage_api,
            token,
        })
    }

    /// 토큰으로 접근 가능한 프로젝트 목록을 조회합니다.
    pub async fn list_projects(&self) -> Result<Vec<Value>, OpenStackError> {
        self.list(&self.identity_api, "/auth/projects", "projects")
            .await
    }

    /// 서버(인스턴스) 상세 목록을 조회합니다.
    pub async fn list_servers(&self) -> Result<Vec<Value>, OpenStackError> {
        self.list(&self.compute_api, "/servers/detail", "servers")
            .await
    }

    /// 볼륨 상세 목록을 조회합니다.
    pub async fn list_volumes(&self) -> Result<Vec<Value>, OpenStackError> {
        self.list(&self.block_storage_api, "/volumes/detail", "volumes")
            .await
    }

    /// 볼륨 스냅샷 상세 목록을 조회합니다.
    pub async fn list_snapshots(&self) -> Result<Vec<Value>, OpenStackError> {
        self.list(&self.block_storage_api, "/snapshots/detail", "snapshots")
            .await
    }

    async fn list(
        &self,
        base: &str,
        path: &'static str,
        field: &'static str,
    ) -> Result<Vec<Value>, OpenStackError> {
        let url = format!("{}{}", base.trim_end_matches('/'), path);
        let body: Value = self
            .http
            .get(&url)
            .header(AUTH_TOKEN_HEADER, &self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match body.get(field).and_then(Value::as_array) {
            Some(items) => Ok(items.clone()),
            None => Err(OpenStackError::UnexpectedPayload {
                endpoint: path,
                reason: format!("missing '{field}' array"),
            }),
        }
    }
}

async fn authenticate(
    http: &reqwest::Client,
    identity_api: &str,
    credential_id: &str,
    credential_secret: &str,
) -> Result<String, OpenStackError> {
    let url = format!("{}/auth/tokens", identity_api.trim_end_matches('/'));
    let body = json!({
        "auth": {
            "identity": {
                "methods": ["application_credential"],
                "application_credential": {
                    "id": credential_id,
                    "secret": credential_secret,
                }
            }
        }
    });

    let response = http.post(&url).json(&body).send().await?;
    if !response.status().is_success() {
        return Err(OpenStackError::Auth(format!(
            "token request to {url} returned {}",
            response.status()
        )));
    }

    response
        .headers()
        .get(SUBJECT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .ok_or_else(|| {
            OpenStackError::Auth(format!("token response missing {SUBJECT_TOKEN_HEADER} header"))
        })
}

fn required_endpoint(
    value: &Option<String>,
    name: &'static str,
) -> Result<String, OpenStackError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or(OpenStackError::MissingEndpoint { name })
}
