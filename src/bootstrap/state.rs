use serde::Serialize;
use std::fmt;

/// 会话生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LifecycleState {
    #[default]
    Idle,
    LoadingResources,
    InitializingEditor,
    ContentSyncing,
    Ready,
    Error,
}

impl LifecycleState {
    /// 是否仍在加载流程中（挂载已开始但未就绪也未失败）
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::LoadingResources | Self::InitializingEditor | Self::ContentSyncing
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::LoadingResources => "loading",
            Self::InitializingEditor => "initializing",
            Self::ContentSyncing => "syncing",
            Self::Ready => "ready",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}
