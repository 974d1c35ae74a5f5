//! 버전 관리 — 스냅샷 버전 카운터
//!
//! 버전은 `MAJOR.MINOR.PATCH` 문자열이며 틱마다 PATCH만 자동 증가합니다.
//! MAJOR/MINOR는 수동 범프용으로 예약되어 있습니다.
//! 시작 시 저장소의 최신 `Metadata` 버전으로 시드되고, 저장소가 비어
//! 있으면 `0.0.0`에서 출발하여 첫 틱이 `0.0.1`을 기록합니다.

/// 스냅샷 버전 카운터
///
/// 오케스트레이터가 단독으로 소유합니다. 실패한 틱에서도 롤백하지
/// 않습니다 — 소비된 버전은 그대로 건너뜁니다.
#[derive(Debug, Clone)]
pub struct VersionManager {
    current: String,
}

impl VersionManager {
    /// 주어진 버전에서 시작하는 카운터를 생성합니다.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            current: initial.into(),
        }
    }

    /// 저장소 조회 결과로 시드합니다. 저장소가 비어 있으면 `0.0.0`.
    pub fn seeded(latest: Option<String>) -> Self {
        Self::new(latest.unwrap_or_else(|| "0.0.0".to_owned()))
    }

    /// 현재 버전을 반환합니다.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// PATCH를 1 증가시킵니다.
    ///
    /// 형식이 `M.N.P`가 아니면 에러를 로그하고 `0.0.0`으로 리셋합니다.
    /// 정합성보다 라이브니스를 택한 동작이며 테스트가 이를 고정합니다.
    pub fn increment(&mut self) {
        self.current = increment_patch(&self.current);
    }
}

fn increment_patch(version: &str) -> String {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 {
        tracing::error!(version = %version, "invalid version format, resetting to 0.0.0");
        return "0.0.0".to_owned();
    }

    let parsed: Result<Vec<u64>, _> = parts.iter().map(|p| p.parse::<u64>()).collect();
    match parsed {
        Ok(nums) => format!("{}.{}.{}", nums[0], nums[1], nums[2] + 1),
        Err(_) => {
            tracing::error!(version = %version, "failed to parse version components, resetting to 0.0.0");
            "0.0.0".to_owned()
        }
    }
}
