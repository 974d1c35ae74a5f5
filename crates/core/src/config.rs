//! 설정 관리 — glassbox.toml 파싱 및 런타임 설정
//!
//! 파일(TOML) → 환경변수 → CLI 플래그 순으로 덮어씁니다.
//! 환경변수 오버라이드는 `NEO4J_HOST` / `NEO4J_PORT` / `NEO4J_USER` /
//! `NEO4J_PASS` / `NEO4J_PROTO` 를 지원합니다.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GlassboxError};

/// Glassbox 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassboxConfig {
    /// 일반 설정
    pub general: GeneralConfig,
    /// 스캔 주기/타임아웃 설정
    pub scanner: ScannerConfig,
    /// 그래프 저장소 연결 설정
    pub graph: GraphConfig,
    /// 프로바이더 목록 (순서 보존, 스캔 순서를 결정)
    pub providers: Vec<ProviderConfig>,
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// PID 파일 경로 (빈 문자열이면 비활성화)
    pub pid_file: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
            pid_file: String::new(),
        }
    }
}

/// 스캐너 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// 스캔 주기 (초)
    pub interval_secs: u64,
    /// 플러그인별 수집 타임아웃 (초)
    pub fetch_timeout_secs: u64,
    /// 그래프 쿼리별 타임아웃 (초)
    pub query_timeout_secs: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            fetch_timeout_secs: 30,
            query_timeout_secs: 10,
        }
    }
}

/// 그래프 저장소 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// bolt 프로토콜 (bolt, bolt+s 등)
    pub proto: String,
    /// 호스트
    pub host: String,
    /// 포트
    pub port: u16,
    /// 사용자
    pub user: String,
    /// 비밀번호
    pub password: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            proto: "bolt".to_owned(),
            host: "localhost".to_owned(),
            port: 7687,
            user: "neo4j".to_owned(),
            password: String::new(),
        }
    }
}

impl GraphConfig {
    /// bolt 접속 URI를 조합합니다.
    pub fn uri(&self) -> String {
        format!("{}://{}:{}", self.proto, self.host, self.port)
    }
}

/// 프로바이더 설정 엔트리
///
/// `name`은 등록된 플러그인 생성자 이름과 일치해야 합니다.
/// `enabled = true` 이면서 생성자가 존재하는 엔트리만 활성화됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// 플러그인 생성자 이름 (예: "openstack", "kubernetes")
    pub name: String,
    /// 활성화 여부
    pub enabled: bool,
    /// 서비스 엔드포인트
    pub api_access: ServiceEndpoints,
    /// 프로바이더별 자격 증명
    pub credentials: ProviderCredentials,
}

/// 프로바이더 서비스 엔드포인트
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceEndpoints {
    /// OpenStack identity (Keystone) API
    pub identity_api: Option<String>,
    /// OpenStack compute (Nova) API
    pub compute_api: Option<String>,
    /// OpenStack block storage (Cinder) API
    pub block_storage_api: Option<String>,
    /// Kubernetes API server
    pub cluster_api: Option<String>,
}

/// 프로바이더 자격 증명
///
/// 필드 해석은 프로바이더별 플러그인의 몫입니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderCredentials {
    /// OpenStack 인증 방식 (예: "v3applicationcredential")
    pub os_auth_type: Option<String>,
    /// OpenStack 애플리케이션 자격 증명 ID
    pub app_credentials_id: Option<String>,
    /// OpenStack 애플리케이션 자격 증명 시크릿
    pub app_credentials_secret: Option<String>,
    /// Kubernetes 서비스 계정 베어러 토큰
    pub bearer_token: Option<String>,
}

impl GlassboxConfig {
    /// TOML 문자열을 파싱합니다.
    pub fn parse(content: &str) -> Result<Self, GlassboxError> {
        toml::from_str(content).map_err(|e| {
            ConfigError::ParseFailed {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// 설정 파일을 읽고 파싱한 뒤 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: &Path) -> Result<Self, GlassboxError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GlassboxError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                GlassboxError::Io(e)
            }
        })?;

        let mut config = Self::parse(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// `NEO4J_*` 환경변수로 그래프 연결 설정을 덮어씁니다.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("NEO4J_HOST") {
            self.graph.host = host;
        }
        if let Ok(port) = std::env::var("NEO4J_PORT") {
            match port.parse() {
                Ok(port) => self.graph.port = port,
                Err(_) => tracing::warn!(value = %port, "ignoring invalid NEO4J_PORT"),
            }
        }
        if let Ok(user) = std::env::var("NEO4J_USER") {
            self.graph.user = user;
        }
        if let Ok(pass) = std::env::var("NEO4J_PASS") {
            self.graph.password = pass;
        }
        if let Ok(proto) = std::env::var("NEO4J_PROTO") {
            self.graph.proto = proto;
        }
    }

    /// 설정 값을 검증합니다.
    ///
    /// 프로바이더별 엔드포인트/자격 증명 검증은 각 플러그인의
    /// `initialize` 단계에서 수행됩니다.
    pub fn validate(&self) -> Result<(), GlassboxError> {
        if !matches!(self.general.log_format.as_str(), "json" | "pretty") {
            return Err(invalid(
                "general.log_format",
                "expected 'json' or 'pretty'",
            ));
        }
        if self.scanner.interval_secs == 0 {
            return Err(invalid("scanner.interval_secs", "must be greater than zero"));
        }
        if self.scanner.fetch_timeout_secs == 0 {
            return Err(invalid(
                "scanner.fetch_timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.scanner.query_timeout_secs == 0 {
            return Err(invalid(
                "scanner.query_timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.graph.port == 0 {
            return Err(invalid("graph.port", "must be greater than zero"));
        }

        let mut seen = std::collections::HashSet::new();
        for provider in &self.providers {
            if provider.name.is_empty() {
                return Err(invalid("providers.name", "must not be empty"));
            }
            if !seen.insert(provider.name.as_str()) {
                return Err(invalid(
                    "providers.name",
                    &format!("duplicate provider entry: {}", provider.name),
                ));
            }
        }
        Ok(())
    }

    /// 활성화된 프로바이더 엔트리만 순서대로 반환합니다.
    pub fn enabled_providers(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter().filter(|p| p.enabled)
    }
}

fn invalid(field: &str, reason: &str) -> GlassboxError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
    .into()
}
