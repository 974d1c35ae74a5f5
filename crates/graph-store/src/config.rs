//! 그래프 저장소 연결 설정

use serde::{Deserialize, Serialize};

/// Neo4j 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStoreConfig {
    /// bolt URI (예: "bolt://localhost:7687")
    pub uri: String,
    /// 사용자
    pub user: String,
    /// 비밀번호
    pub password: String,
    /// 쿼리별 타임아웃 (초)
    pub query_timeout_secs: u64,
}

impl Default for GraphStoreConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_owned(),
            user: "neo4j".to_owned(),
            password: String::new(),
            query_timeout_secs: 10,
        }
    }
}
