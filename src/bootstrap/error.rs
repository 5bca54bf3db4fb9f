use std::time::Duration;
use thiserror::Error;

use crate::host::InstanceError;
use crate::resource::LoadError;

/// 终止会话的错误，出现后会话进入 Error 状态
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    #[error("编辑器资源加载失败：{0}")]
    ResourceLoad(#[from] LoadError),

    #[error("编辑器库 {global} 在 {}ms 内（{attempts} 次轮询）未就绪", waited.as_millis())]
    FactoryTimeout {
        global: String,
        attempts: u32,
        waited: Duration,
    },

    #[error("编辑器实例化失败：{0}")]
    Instantiation(#[source] InstanceError),

    #[error("会话已挂载，不能重复挂载")]
    AlreadyMounted,

    #[error("会话已卸载")]
    Unmounted,

    #[error("容器 {0} 已承载其他会话")]
    ContainerBusy(String),
}

impl BootstrapError {
    /// 是否是加载流程本身的失败（而非调用方的误用）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ResourceLoad(_) | Self::FactoryTimeout { .. } | Self::Instantiation(_)
        )
    }
}

/// 不影响会话状态的问题，只记录日志
#[derive(Debug, Error)]
pub enum Warning {
    #[error("样式表加载失败，继续加载脚本：{0}")]
    StylesheetLoad(LoadError),

    #[error("扩展包加载失败，使用基础编辑器：{0}")]
    ExtensionLoad(LoadError),

    #[error("设置编辑器内容失败：{0}")]
    ContentApply(InstanceError),

    #[error("销毁编辑器实例失败：{0}")]
    Teardown(InstanceError),

    #[error("编辑器报告错误")]
    EditorReported,
}

impl Warning {
    pub fn log(self) {
        tracing::warn!("{self}");
    }
}
