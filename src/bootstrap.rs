pub mod error;
pub mod poll;
pub mod session;
pub mod state;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::active::ActiveEditor;
use crate::config::BootstrapConfig;
use crate::host::{EditorConfig, GlobalRegistry, Sleeper, TokioSleeper};
use crate::resource::{ResourceCache, ResourceLoader};

pub use error::{BootstrapError, Warning};
pub use session::{EditorSession, MountOptions, OnChange};
pub use state::LifecycleState;

/// 编辑器加载器：持有加载所需的全部依赖，为每个挂载点创建独立会话
#[derive(Clone)]
pub struct EditorBootstrap {
    pub(crate) config: Arc<BootstrapConfig>,
    pub(crate) loader: Arc<dyn ResourceLoader>,
    pub(crate) cache: Arc<ResourceCache>,
    pub(crate) globals: Arc<dyn GlobalRegistry>,
    pub(crate) sleeper: Arc<dyn Sleeper>,
    pub(crate) active: Arc<ActiveEditor>,
    /// 已被会话占用的容器 id，同一容器同时只承载一个会话
    containers: Arc<Mutex<HashSet<String>>>,
}

impl EditorBootstrap {
    /// 使用进程级资源缓存与活动编辑器引用
    pub fn new(
        config: BootstrapConfig,
        loader: Arc<dyn ResourceLoader>,
        globals: Arc<dyn GlobalRegistry>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            loader,
            cache: ResourceCache::global(),
            globals,
            sleeper: Arc::new(TokioSleeper),
            active: ActiveEditor::global(),
            containers: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn with_cache(mut self, cache: Arc<ResourceCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_active_editor(mut self, active: Arc<ActiveEditor>) -> Self {
        self.active = active;
        self
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    pub fn active_editor(&self) -> &Arc<ActiveEditor> {
        &self.active
    }

    /// 创建一个处于 Idle 的新会话
    pub fn session(&self) -> EditorSession {
        EditorSession::new(self.clone())
    }

    /// 创建会话并挂载，编辑器就绪后返回
    pub async fn mount(&self, options: MountOptions) -> Result<EditorSession, BootstrapError> {
        let session = self.session();
        session.mount(options).await?;
        Ok(session)
    }

    /// 默认配置与调用方覆盖项合并，键冲突时调用方优先
    pub(crate) fn editor_config(&self, overrides: &EditorConfig) -> EditorConfig {
        let mut merged = self.config.editor.clone();
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// 占用容器，已被其他会话占用时返回 false
    pub(crate) fn claim_container(&self, container_id: &str) -> bool {
        self.containers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(container_id.to_string())
    }

    pub(crate) fn release_container(&self, container_id: &str) {
        self.containers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(container_id);
    }

    /// 编辑器库、配置对象与通用库是否都已存在于全局
    pub(crate) fn globals_present(&self) -> bool {
        self.config
            .globals
            .all()
            .iter()
            .all(|name| self.globals.has_global(name))
    }
}
