//! 그래프 저장소 에러 타입
//!
//! `From<GraphStoreError> for GlassboxError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.

use glassbox_core::error::{GlassboxError, StorageError};

/// 그래프 저장소 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum GraphStoreError {
    /// neo4rs 드라이버 에러
    #[error("neo4j driver error: {0}")]
    Database(#[from] neo4rs::Error),

    /// 연결 실패
    #[error("connection failed: {0}")]
    Connection(String),

    /// 쿼리 타임아웃
    #[error("query timed out after {secs}s")]
    Timeout { secs: u64 },

    /// 제약 조건 설치 실패
    #[error("constraint setup failed for label {label}: {reason}")]
    Constraint { label: String, reason: String },

    /// 저장할 수 없는 페이로드 (예: 잘못된 PD 지표 JSON)
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// 이 연산으로 만들 수 없는 컴포넌트 유형
    #[error("unsupported component type for this operation: {0}")]
    Unsupported(String),
}

impl From<GraphStoreError> for GlassboxError {
    fn from(err: GraphStoreError) -> Self {
        match err {
            GraphStoreError::Database(e) => {
                GlassboxError::Storage(StorageError::Query(e.to_string()))
            }
            GraphStoreError::Connection(msg) => {
                GlassboxError::Storage(StorageError::Connection(msg))
            }
            GraphStoreError::Timeout { secs } => {
                GlassboxError::Storage(StorageError::Timeout { secs })
            }
            GraphStoreError::Constraint { label, reason } => {
                GlassboxError::Storage(StorageError::Constraint { label, reason })
            }
            GraphStoreError::InvalidPayload(msg) => {
                GlassboxError::Storage(StorageError::InvalidPayload(msg))
            }
            GraphStoreError::Unsupported(msg) => {
                GlassboxError::Storage(StorageError::Query(msg))
            }
        }
    }
}
