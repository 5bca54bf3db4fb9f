use std::sync::{Arc, Mutex, Weak};
use tokio::sync::{oneshot, watch};
use ulid::Ulid;

use crate::bootstrap::poll::poll_until;
use crate::bootstrap::{BootstrapError, EditorBootstrap, LifecycleState, Warning};
use crate::host::{EditorConfig, EditorEvent, EditorInstance};
use crate::resource::ResourceKind;

/// 内容变更回调，参数为编辑器当前内容
pub type OnChange = Arc<dyn Fn(&str) + Send + Sync>;

/// 挂载参数
pub struct MountOptions {
    pub container_id: String,
    pub initial_content: String,
    pub on_change: Option<OnChange>,
    pub overrides: EditorConfig,
}

impl MountOptions {
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            initial_content: String::new(),
            on_change: None,
            overrides: EditorConfig::new(),
        }
    }

    pub fn initial_content(mut self, content: impl Into<String>) -> Self {
        self.initial_content = content.into();
        self
    }

    pub fn on_change(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(f));
        self
    }

    pub fn override_config(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.overrides.insert(key.into(), value);
        self
    }
}

/// 单个挂载点上的编辑器会话
///
/// 克隆得到的是同一会话的句柄，可在挂载进行中从别处调用
/// `update_content` 或 `unmount`。
#[derive(Clone)]
pub struct EditorSession {
    inner: Arc<Inner>,
}

struct Inner {
    id: Ulid,
    deps: EditorBootstrap,
    state: watch::Sender<LifecycleState>,
    shared: Mutex<Shared>,
}

#[derive(Default)]
struct Shared {
    mounted: bool,
    /// 是否占用着 container_id 对应的容器
    claimed: bool,
    disposed: bool,
    ready: bool,
    container_id: String,
    instance: Option<Arc<dyn EditorInstance>>,
    /// 尚未应用到编辑器的最新内容，只保留最后一次
    pending: Option<String>,
    on_change: Option<OnChange>,
    ready_tx: Option<oneshot::Sender<()>>,
    error: Option<BootstrapError>,
}

impl EditorSession {
    pub(crate) fn new(deps: EditorBootstrap) -> Self {
        let (state, _) = watch::channel(LifecycleState::Idle);
        Self {
            inner: Arc::new(Inner {
                id: Ulid::new(),
                deps,
                state,
                shared: Mutex::new(Shared::default()),
            }),
        }
    }

    pub fn id(&self) -> Ulid {
        self.inner.id
    }

    pub fn state(&self) -> LifecycleState {
        *self.inner.state.borrow()
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.inner.state.subscribe()
    }

    /// 导致会话进入 Error 的原因
    pub fn error(&self) -> Option<BootstrapError> {
        self.inner.lock().error.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.lock().ready
    }

    /// 底层编辑器实例，实例化之前为 None
    pub fn instance(&self) -> Option<Arc<dyn EditorInstance>> {
        self.inner.lock().instance.clone()
    }

    /// 挂载编辑器，直到实例触发 ready 才返回
    pub async fn mount(&self, options: MountOptions) -> Result<(), BootstrapError> {
        let inner = &self.inner;
        {
            let mut shared = inner.lock();
            if shared.disposed {
                return Err(BootstrapError::Unmounted);
            }
            if shared.mounted {
                tracing::warn!("会话 {} 重复挂载，已忽略", inner.id);
                return Err(BootstrapError::AlreadyMounted);
            }
            if !inner.deps.claim_container(&options.container_id) {
                tracing::warn!("容器 {} 已承载其他会话，拒绝挂载", options.container_id);
                return Err(BootstrapError::ContainerBusy(options.container_id));
            }
            shared.mounted = true;
            shared.claimed = true;
            shared.container_id = options.container_id.clone();
            shared.pending = Some(options.initial_content);
            shared.on_change = options.on_change;
        }

        if inner.deps.globals_present() {
            tracing::debug!("编辑器全局对象已存在，跳过资源加载");
        } else {
            inner.transition(LifecycleState::LoadingResources);
            self.load_resources().await?;
        }

        inner.ensure_alive()?;
        inner.transition(LifecycleState::InitializingEditor);

        let deps = &inner.deps;
        let poll = &deps.config.poll;
        let (factory, attempts) = poll_until(
            deps.sleeper.as_ref(),
            poll.interval(),
            poll.max_attempts,
            || deps.globals.editor_factory(),
        )
        .await;
        inner.ensure_alive()?;

        let Some(factory) = factory else {
            return Err(inner.fail(BootstrapError::FactoryTimeout {
                global: deps.config.globals.editor.clone(),
                attempts,
                waited: poll.interval() * attempts.saturating_sub(1),
            }));
        };
        tracing::debug!("编辑器工厂在第 {attempts} 次轮询时可用");

        let config = deps.editor_config(&options.overrides);
        let instance = factory
            .get_editor(&options.container_id, &config)
            .map_err(|e| inner.fail(BootstrapError::Instantiation(e)))?;

        let (ready_tx, ready_rx) = oneshot::channel();
        {
            let mut shared = inner.lock();
            if shared.disposed {
                drop(shared);
                if let Err(e) = instance.destroy() {
                    Warning::Teardown(e).log();
                }
                return Err(BootstrapError::Unmounted);
            }
            shared.instance = Some(Arc::clone(&instance));
            shared.ready_tx = Some(ready_tx);
        }

        // 回调只持有弱引用，会话释放后触发的回调直接忽略
        let weak = Arc::downgrade(inner);
        instance.add_listener(
            EditorEvent::Ready,
            Arc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.on_ready();
                }
            }),
        );
        let id = inner.id;
        instance.add_listener(
            EditorEvent::Error,
            Arc::new(move || {
                tracing::debug!("会话 {id} 收到编辑器 error 事件");
                Warning::EditorReported.log();
            }),
        );

        match ready_rx.await {
            Ok(()) => Ok(()),
            Err(_) => Err(BootstrapError::Unmounted),
        }
    }

    /// 外部内容更新：就绪后与当前内容比较再写入，未就绪时覆盖待应用内容
    pub fn update_content(&self, content: impl Into<String>) {
        let content = content.into();
        let instance = {
            let mut shared = self.inner.lock();
            if shared.error.is_some() || shared.disposed {
                tracing::debug!("会话 {} 不可用，忽略内容更新", self.inner.id);
                return;
            }
            if !shared.ready {
                shared.pending = Some(content);
                return;
            }
            match shared.instance.clone() {
                Some(instance) => instance,
                None => return,
            }
        };
        apply_if_changed(instance.as_ref(), &content);
    }

    /// 就绪前返回空字符串
    pub fn get_content(&self) -> String {
        match self.ready_instance() {
            Some(instance) => instance.get_content(),
            None => String::new(),
        }
    }

    /// 就绪前静默丢弃
    pub fn set_content(&self, content: &str) {
        if let Some(instance) = self.ready_instance()
            && let Err(e) = instance.set_content(content)
        {
            Warning::ContentApply(e).log();
        }
    }

    /// 卸载会话，销毁实例；挂载未完成时同样安全
    pub fn unmount(&self) {
        let inner = &self.inner;
        let (instance, failed, claimed) = {
            let mut shared = inner.lock();
            if shared.disposed {
                return;
            }
            shared.disposed = true;
            shared.ready = false;
            shared.pending = None;
            shared.on_change = None;
            // 丢弃 sender，使挂载中的 mount() 以 Unmounted 结束
            shared.ready_tx = None;
            (
                shared.instance.take(),
                shared.error.is_some(),
                take_claim(&mut shared),
            )
        };

        if let Some(instance) = instance {
            inner.deps.active.release(&instance);
            if let Err(e) = instance.destroy() {
                Warning::Teardown(e).log();
            }
        }
        if let Some(container_id) = claimed {
            inner.deps.release_container(&container_id);
        }

        if !failed {
            inner.transition(LifecycleState::Idle);
        }
        tracing::debug!("会话 {} 已卸载", inner.id);
    }

    fn ready_instance(&self) -> Option<Arc<dyn EditorInstance>> {
        let shared = self.inner.lock();
        if shared.ready {
            shared.instance.clone()
        } else {
            None
        }
    }

    /// 按顺序加载必需资源，最后尝试扩展包
    async fn load_resources(&self) -> Result<(), BootstrapError> {
        let inner = &self.inner;
        let deps = &inner.deps;
        let loader = deps.loader.as_ref();

        for resource in deps.config.resources.required() {
            let outcome = deps.cache.load(loader, &resource).await;
            inner.ensure_alive()?;
            match outcome {
                Ok(()) => {}
                Err(e) if resource.kind == ResourceKind::Stylesheet => {
                    Warning::StylesheetLoad(e).log();
                }
                Err(e) => return Err(inner.fail(BootstrapError::ResourceLoad(e))),
            }
        }

        if let Some(extension) = deps.config.resources.extension() {
            let outcome = deps.cache.load(loader, &extension).await;
            inner.ensure_alive()?;
            if let Err(e) = outcome {
                Warning::ExtensionLoad(e).log();
            }
        }

        Ok(())
    }
}

impl Inner {
    fn lock(&self) -> std::sync::MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn transition(&self, to: LifecycleState) {
        let from = self.state.send_replace(to);
        tracing::debug!("会话 {}：{} -> {}", self.id, from, to);
    }

    /// 卸载后的挂载流程在每个挂起点之后立即停止
    fn ensure_alive(&self) -> Result<(), BootstrapError> {
        if self.lock().disposed {
            Err(BootstrapError::Unmounted)
        } else {
            Ok(())
        }
    }

    /// 进入 Error 并让出容器，失败的会话不再占用挂载点
    fn fail(&self, err: BootstrapError) -> BootstrapError {
        let claimed = {
            let mut shared = self.lock();
            if shared.disposed {
                return BootstrapError::Unmounted;
            }
            shared.error = Some(err.clone());
            shared.ready_tx = None;
            take_claim(&mut shared)
        };
        if let Some(container_id) = claimed {
            self.deps.release_container(&container_id);
        }
        tracing::error!("会话 {} 加载失败：{err}", self.id);
        self.transition(LifecycleState::Error);
        err
    }

    /// 实例 ready 回调：应用待定内容、注册内容监听、进入 Ready
    ///
    /// 状态切换都在会话锁内完成，与 `unmount` 互斥，卸载后不会再出现
    /// ContentSyncing 或 Ready。
    fn on_ready(self: &Arc<Self>) {
        let (instance, ready_tx) = {
            let mut shared = self.lock();
            if shared.disposed || shared.ready || shared.ready_tx.is_none() {
                return;
            }
            let Some(instance) = shared.instance.clone() else {
                return;
            };
            self.transition(LifecycleState::ContentSyncing);
            // 内容监听尚未注册，持锁写入不会重入会话
            if let Some(content) = shared.pending.take() {
                apply(instance.as_ref(), &content);
            }
            (instance, shared.ready_tx.take())
        };

        let weak: Weak<Inner> = Arc::downgrade(self);
        instance.add_listener(
            EditorEvent::ContentChange,
            Arc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.forward_change();
                }
            }),
        );

        let container_id = loop {
            let late = {
                let mut shared = self.lock();
                if shared.disposed {
                    return;
                }
                match shared.pending.take() {
                    Some(content) => content,
                    None => {
                        shared.ready = true;
                        if self.deps.active.set_if_empty(&instance) {
                            tracing::debug!("会话 {} 成为当前活动编辑器", self.id);
                        }
                        self.transition(LifecycleState::Ready);
                        break shared.container_id.clone();
                    }
                }
            };
            // ContentSyncing 期间到达的更新
            apply_if_changed(instance.as_ref(), &late);
        };
        tracing::info!("编辑器已就绪：{container_id}");

        if let Some(tx) = ready_tx {
            let _ = tx.send(());
        }
    }

    fn forward_change(&self) {
        let (instance, on_change) = {
            let shared = self.lock();
            if !shared.ready {
                return;
            }
            match (shared.instance.clone(), shared.on_change.clone()) {
                (Some(instance), Some(on_change)) => (instance, on_change),
                _ => return,
            }
        };
        on_change(&instance.get_content());
    }
}

fn take_claim(shared: &mut Shared) -> Option<String> {
    std::mem::take(&mut shared.claimed).then(|| shared.container_id.clone())
}

fn apply(instance: &dyn EditorInstance, content: &str) {
    if let Err(e) = instance.set_content(content) {
        Warning::ContentApply(e).log();
    }
}

/// 内容不同才写入，避免打断光标与滚动位置
fn apply_if_changed(instance: &dyn EditorInstance, content: &str) {
    if instance.get_content() != content {
        apply(instance, content);
    }
}
