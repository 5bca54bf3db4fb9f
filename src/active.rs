use std::sync::{Arc, LazyLock, Mutex};

use crate::host::EditorInstance;

static GLOBAL: LazyLock<Arc<ActiveEditor>> = LazyLock::new(|| Arc::new(ActiveEditor::new()));

/// 当前活动编辑器的进程级引用，仅供插入工具等旁路查找使用
///
/// 由第一个进入 Ready 的会话设置，其他会话不会覆盖或清除它。
/// 多实例并存时它未必指向用户正在编辑的那一个。
#[derive(Default)]
pub struct ActiveEditor {
    slot: Mutex<Option<Arc<dyn EditorInstance>>>,
}

impl ActiveEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    pub fn get(&self) -> Option<Arc<dyn EditorInstance>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// 尚未设置时写入，返回是否写入成功
    pub fn set_if_empty(&self, instance: &Arc<dyn EditorInstance>) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return false;
        }
        *slot = Some(Arc::clone(instance));
        true
    }

    /// 仅当引用指向给定实例时清除，由该实例所属会话在卸载时调用
    pub fn release(&self, instance: &Arc<dyn EditorInstance>) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if slot.as_ref().is_some_and(|cur| Arc::ptr_eq(cur, instance)) {
            *slot = None;
        }
    }
}
