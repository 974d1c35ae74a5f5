//! 플러그인 프레임워크 — 프로바이더 추상화, 생성자 레지스트리, 활성 집합 관리
//!
//! [`Plugin`] trait은 모든 프로바이더 플러그인이 구현하는 수집 계약입니다.
//! [`PluginManager`]는 생성자 레지스트리(`이름 → 팩토리`)와 초기화된
//! 활성 인스턴스 집합을 소유합니다.
//!
//! # 활성화 규칙
//!
//! 프로바이더 설정 엔트리가 `enabled = true` 이고 같은 이름의 생성자가
//! 등록되어 있을 때만 활성화됩니다. 미등록 이름은 경고 후 건너뛰고,
//! 초기화에 실패한 플러그인도 건너뜁니다 (재시도 없음).
//!
//! # 실패 격리
//!
//! 스캔 틱 중 `fetch_data`가 실패한 플러그인은 그 틱에서만 제외됩니다.
//! 활성 집합은 시작 이후 읽기 전용이며, 플러그인이 제거되는 일은 없습니다.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::config::ProviderConfig;
use crate::error::{GlassboxError, PluginError};
use crate::model::RawData;

/// dyn-compatible Future 타입 별칭
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// ─── Plugin Trait ────────────────────────────────────────────────────

/// 모든 프로바이더 플러그인이 구현하는 수집 계약
///
/// # 계약
///
/// - `initialize`: 설정 블록으로부터 자격 증명과 엔드포인트를 확립합니다.
///   인증/엔드포인트 탐색/스키마 프로브 실패 시 에러를 반환합니다.
///   프로세스 시작 시 한 번만 호출되며 재시도하지 않습니다.
/// - `fetch_data`: 프로바이더의 전체 [`RawData`] 스냅샷을 반환합니다.
///   매 호출은 독립적인 읽기 전용 순회이며, 캐시된 자격 증명/클라이언트
///   외의 가변 상태를 호출 간에 유지해서는 안 됩니다.
pub trait Plugin: Send + Sync {
    /// 설정으로부터 플러그인을 초기화합니다.
    fn initialize(
        &mut self,
        config: &ProviderConfig,
    ) -> impl Future<Output = Result<(), GlassboxError>> + Send;

    /// 프로바이더의 전체 스냅샷을 수집합니다.
    fn fetch_data(&self) -> impl Future<Output = Result<RawData, GlassboxError>> + Send;
}

// ─── DynPlugin Trait ─────────────────────────────────────────────────

/// dyn-compatible 플러그인 trait
///
/// `Plugin` trait은 RPITIT를 사용하므로 `dyn Plugin`이 불가합니다.
/// `DynPlugin`은 `BoxFuture`를 반환하여 활성 집합을
/// `Vec<Box<dyn DynPlugin>>` 형태로 동적 관리할 수 있게 합니다.
pub trait DynPlugin: Send + Sync {
    /// 설정으로부터 플러그인을 초기화합니다.
    fn initialize<'a>(
        &'a mut self,
        config: &'a ProviderConfig,
    ) -> BoxFuture<'a, Result<(), GlassboxError>>;

    /// 프로바이더의 전체 스냅샷을 수집합니다.
    fn fetch_data(&self) -> BoxFuture<'_, Result<RawData, GlassboxError>>;
}

/// Plugin을 구현한 타입은 자동으로 DynPlugin도 구현됩니다.
impl<T: Plugin> DynPlugin for T {
    fn initialize<'a>(
        &'a mut self,
        config: &'a ProviderConfig,
    ) -> BoxFuture<'a, Result<(), GlassboxError>> {
        Box::pin(Plugin::initialize(self, config))
    }

    fn fetch_data(&self) -> BoxFuture<'_, Result<RawData, GlassboxError>> {
        Box::pin(Plugin::fetch_data(self))
    }
}

/// 새 플러그인 인스턴스를 만드는 무인자 팩토리
pub type PluginConstructor = Box<dyn Fn() -> Box<dyn DynPlugin> + Send + Sync>;

// ─── PluginManager ───────────────────────────────────────────────────

/// 플러그인 매니저
///
/// 두 매핑을 유지합니다:
/// - `constructors`: 이름 → 팩토리. 프로그램 시작 시 고정됩니다.
/// - `active`: 설정으로부터 채워진 초기화 완료 인스턴스 목록.
///   설정 파일의 프로바이더 순서를 보존하므로 스캔 순서가 결정적입니다.
pub struct PluginManager {
    constructors: HashMap<String, PluginConstructor>,
    active: Vec<(String, Box<dyn DynPlugin>)>,
}

impl PluginManager {
    /// 빈 매니저를 생성합니다.
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
            active: Vec::new(),
        }
    }

    /// 플러그인 생성자를 등록합니다.
    ///
    /// 동일한 이름의 생성자가 이미 등록되어 있으면 에러를 반환합니다.
    pub fn register_constructor(
        &mut self,
        name: &str,
        constructor: impl Fn() -> Box<dyn DynPlugin> + Send + Sync + 'static,
    ) -> Result<(), GlassboxError> {
        if self.constructors.contains_key(name) {
            return Err(PluginError::AlreadyRegistered {
                name: name.to_owned(),
            }
            .into());
        }
        self.constructors
            .insert(name.to_owned(), Box::new(constructor));
        Ok(())
    }

    /// 설정의 프로바이더 목록으로부터 활성 집합을 구성합니다.
    ///
    /// 엔트리별 규칙:
    /// - `enabled = false` → 건너뜀
    /// - 생성자 미등록 → 경고 후 건너뜀
    /// - `initialize` 실패 → 경고 후 건너뜀 (활성 집합에 들어가지 않음)
    ///
    /// 활성화된 플러그인 수를 반환합니다.
    pub async fn init_from_config(&mut self, providers: &[ProviderConfig]) -> usize {
        for provider in providers {
            if !provider.enabled {
                tracing::debug!(provider = %provider.name, "provider disabled, skipping");
                continue;
            }

            let Some(constructor) = self.constructors.get(&provider.name) else {
                tracing::warn!(
                    provider = %provider.name,
                    "no plugin constructor registered, skipping"
                );
                continue;
            };

            let mut plugin = constructor();
            match plugin.initialize(provider).await {
                Ok(()) => {
                    tracing::info!(provider = %provider.name, "plugin initialized");
                    self.active.push((provider.name.clone(), plugin));
                }
                Err(e) => {
                    tracing::warn!(
                        provider = %provider.name,
                        error = %e,
                        "plugin initialization failed, skipping"
                    );
                }
            }
        }
        self.active.len()
    }

    /// 활성 플러그인을 설정 순서대로 순회합니다.
    pub fn active(&self) -> impl Iterator<Item = (&str, &dyn DynPlugin)> {
        self.active.iter().map(|(name, p)| (name.as_str(), &**p))
    }

    /// 활성 플러그인 수를 반환합니다.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// 이름으로 활성 플러그인을 조회합니다.
    pub fn get(&self, name: &str) -> Option<&dyn DynPlugin> {
        self.active
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| &**p)
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
