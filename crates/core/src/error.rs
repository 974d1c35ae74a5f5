//! 에러 타입 — 도메인별 에러 정의

/// Glassbox 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum GlassboxError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 플러그인 에러
    #[error("plugin error: {0}")]
    Plugin(#[from] PluginError),

    /// 변환 에러
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),

    /// 그래프 저장소 에러
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 플러그인 에러
///
/// 개별 프로바이더 플러그인의 초기화/수집 실패를 나타냅니다.
/// 스캔 파이프라인은 이 에러들을 해당 플러그인에 국한시키고
/// 나머지 플러그인을 계속 진행합니다.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// 등록되지 않은 프로바이더 이름
    #[error("no plugin constructor registered for provider: {name}")]
    UnknownProvider { name: String },

    /// 동일한 이름의 생성자가 이미 등록됨
    #[error("plugin constructor already registered: {name}")]
    AlreadyRegistered { name: String },

    /// 플러그인 초기화 실패 (인증, 엔드포인트 탐색, 스키마 프로브)
    #[error("plugin init failed: {name}: {reason}")]
    InitFailed { name: String, reason: String },

    /// 스냅샷 수집 실패
    #[error("plugin fetch failed: {name}: {reason}")]
    FetchFailed { name: String, reason: String },

    /// 스냅샷 수집 타임아웃
    #[error("plugin fetch timed out: {name}: {secs}s")]
    FetchTimeout { name: String, secs: u64 },
}

/// 변환 에러
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// 변환기가 처리할 수 없는 키
    #[error("unknown raw data key: {key}")]
    UnknownKey { key: String },

    /// 등록된 변환기가 없는 접두사
    #[error("no transformer registered for prefix: {prefix}")]
    UnknownPrefix { prefix: String },

    /// 동일한 접두사의 변환기가 이미 등록됨
    #[error("transformer already registered for prefix: {prefix}")]
    PrefixRegistered { prefix: String },

    /// 프로바이더 응답 디코딩 실패
    #[error("failed to decode raw item for '{key}': {reason}")]
    Decode { key: String, reason: String },
}

/// 그래프 저장소 에러
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 연결 실패
    #[error("connection failed: {0}")]
    Connection(String),

    /// 쿼리 실패
    #[error("query failed: {0}")]
    Query(String),

    /// 제약 조건 설치 실패
    #[error("constraint setup failed for label {label}: {reason}")]
    Constraint { label: String, reason: String },

    /// 쿼리 타임아웃
    #[error("query timed out after {secs}s")]
    Timeout { secs: u64 },

    /// 저장할 수 없는 페이로드 (예: 잘못된 PD 지표 JSON)
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}
