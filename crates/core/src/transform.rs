//! 변환 프레임워크 — 접두사 기반 디스패치와 변환기 레지스트리
//!
//! [`Transformer`]는 프로바이더 원시 레코드를 중립 [`Component`]로
//! 매핑합니다. [`TransformerRegistry`]는 짧은 프로바이더 접두사
//! (`os`, `k8s`, …)로 변환기를 찾아 [`RawData`] 엔트리를 순서대로
//! 디스패치합니다.
//!
//! # 실패 격리
//!
//! 알 수 없는 접두사와 개별 엔트리의 변환 실패는 해당 엔트리만
//! 건너뛰며, 결과는 [`TransformOutcome::skipped`]에 구조화되어
//! 집계됩니다. 한 엔트리의 실패가 다른 접두사의 출력에 영향을
//! 주지 않습니다.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::TransformError;
use crate::model::{Component, RawData};

// ─── Transformer Trait ───────────────────────────────────────────────

/// 프로바이더 원시 레코드를 중립 컴포넌트로 매핑하는 변환기
///
/// 변환기는 틱 간에는 상태가 없어야 합니다. 틱 내부 스크래치 상태
/// (예: 쿠버네티스 변환기의 PVC→PV 맵)는 [`begin_tick`](Self::begin_tick)
/// 에서 초기화되어 같은 틱 안에서만 소비됩니다.
pub trait Transformer: Send + Sync {
    /// 새 스캔 틱의 시작을 알립니다. 틱 내부 스크래치 상태를 비웁니다.
    fn begin_tick(&mut self) {}

    /// 키 하나의 레코드 목록을 컴포넌트 목록으로 변환합니다.
    ///
    /// 같은 `(key, items)` 입력에 대해 (문서화된 틱 내부 스크래치 상태를
    /// 제외하면) 항상 같은 출력을 내야 합니다.
    fn transform(&mut self, key: &str, items: &[Value]) -> Result<Vec<Component>, TransformError>;
}

// ─── TransformOutcome ────────────────────────────────────────────────

/// 한 번의 디스패치 결과
///
/// 성공한 컴포넌트와 건너뛴 엔트리를 함께 담습니다. 호출자는
/// `skipped`를 구조화 로그로 보고합니다.
#[derive(Debug, Default)]
pub struct TransformOutcome {
    /// 방출 순서가 보존된 컴포넌트 목록
    pub components: Vec<Component>,
    /// 건너뛴 (키, 에러) 목록
    pub skipped: Vec<(String, TransformError)>,
}

// ─── TransformerRegistry ─────────────────────────────────────────────

/// 접두사 → 변환기 레지스트리
///
/// 시작 시 구성되어 오케스트레이터에 명시적 의존성으로 전달됩니다.
/// 테스트는 독립적인 레지스트리를 생성해 사용합니다.
pub struct TransformerRegistry {
    transformers: HashMap<String, Box<dyn Transformer>>,
}

impl TransformerRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self {
            transformers: HashMap::new(),
        }
    }

    /// 접두사에 변환기를 등록합니다.
    ///
    /// 동일한 접두사가 이미 등록되어 있으면 에러를 반환합니다.
    pub fn register(
        &mut self,
        prefix: &str,
        transformer: Box<dyn Transformer>,
    ) -> Result<(), TransformError> {
        if self.transformers.contains_key(prefix) {
            return Err(TransformError::PrefixRegistered {
                prefix: prefix.to_owned(),
            });
        }
        self.transformers.insert(prefix.to_owned(), transformer);
        Ok(())
    }

    /// 등록된 변환기 수를 반환합니다.
    pub fn count(&self) -> usize {
        self.transformers.len()
    }

    /// [`RawData`]를 삽입 순서대로 디스패치하여 컴포넌트로 변환합니다.
    ///
    /// 디스패치 시작 시 모든 변환기의 틱 내부 스크래치 상태가
    /// 초기화됩니다. 키는 첫 번째 밑줄에서 잘라 접두사를 얻습니다.
    pub fn transform_data(&mut self, raw: &RawData) -> TransformOutcome {
        for transformer in self.transformers.values_mut() {
            transformer.begin_tick();
        }

        let mut outcome = TransformOutcome::default();
        for (key, items) in raw.iter() {
            let prefix = key.split('_').next().unwrap_or(key);

            let Some(transformer) = self.transformers.get_mut(prefix) else {
                tracing::warn!(key = %key, prefix = %prefix, "no transformer found for key");
                outcome.skipped.push((
                    key.to_owned(),
                    TransformError::UnknownPrefix {
                        prefix: prefix.to_owned(),
                    },
                ));
                continue;
            };

            match transformer.transform(key, items) {
                Ok(mut components) => outcome.components.append(&mut components),
                Err(e) => {
                    tracing::error!(key = %key, error = %e, "transforming entry failed");
                    outcome.skipped.push((key.to_owned(), e));
                }
            }
        }
        outcome
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
