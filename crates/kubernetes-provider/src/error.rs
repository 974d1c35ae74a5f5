//! 쿠버네티스 플러그인 에러 타입

/// 쿠버네티스 플러그인 도메인 에러
///
/// 플러그인 경계(`initialize` / `fetch_data`)에서 core의
/// `PluginError`로 문맥과 함께 변환됩니다.
#[derive(Debug, thiserror::Error)]
pub enum KubernetesError {
    /// 필수 엔드포인트 누락
    #[error("missing endpoint in provider config: {name}")]
    MissingEndpoint { name: &'static str },

    /// 필수 자격 증명 누락
    #[error("missing credential in provider config: {name}")]
    MissingCredential { name: &'static str },

    /// API 서버 프로브 실패
    #[error("api server probe failed: {0}")]
    Probe(String),

    /// HTTP 요청 실패
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 응답 형태가 기대와 다름
    #[error("unexpected payload from {endpoint}: {reason}")]
    UnexpectedPayload {
        endpoint: &'static str,
        reason: String,
    },
}
