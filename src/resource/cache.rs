use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::resource::{Resource, ResourceKind, ResourceLoader};

static GLOBAL: LazyLock<Arc<ResourceCache>> = LazyLock::new(|| Arc::new(ResourceCache::new()));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} {url} 加载失败：{cause}")]
pub struct LoadError {
    pub url: String,
    pub kind: ResourceKind,
    pub cause: String,
}

type Slot = Arc<OnceCell<Result<(), LoadError>>>;

/// 按 URL 去重的资源加载缓存
///
/// 同一 URL 任意时刻至多一个加载在进行，并发请求共享同一结果。
/// 成功结果永久保留；失败结果在本轮等待者全部拿到后移除，
/// 以便重新挂载时可以重试。
#[derive(Default)]
pub struct ResourceCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 进程级共享缓存
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    pub async fn load(
        &self,
        loader: &dyn ResourceLoader,
        resource: &Resource,
    ) -> Result<(), LoadError> {
        let slot = self.slot(&resource.url);

        if let Some(outcome) = slot.get() {
            tracing::debug!("资源已加载，跳过：{}", resource.url);
            return outcome.clone();
        }

        let outcome = slot
            .get_or_init(|| async {
                tracing::debug!("加载{}：{}", resource.kind, resource.url);
                loader.load(resource).await.map_err(|cause| LoadError {
                    url: resource.url.clone(),
                    kind: resource.kind,
                    cause,
                })
            })
            .await
            .clone();

        if outcome.is_err() {
            self.evict(&resource.url, &slot);
        }
        outcome
    }

    fn slot(&self, url: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(slots.entry(url.to_string()).or_default())
    }

    fn evict(&self, url: &str, failed: &Slot) {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        // 只移除本次失败的槽位，后来者新建的槽位保持不动
        if slots.get(url).is_some_and(|current| Arc::ptr_eq(current, failed)) {
            slots.remove(url);
        }
    }
}
