//! 宿主环境适配层：全局对象、编辑器工厂与编辑器实例
//!
//! 浏览器中的 `window` 全局对象与第三方编辑器库均通过这里的 trait 注入，
//! 测试使用内存实现替代。

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub type EditorConfig = serde_json::Map<String, serde_json::Value>;

/// 编辑器实例回调
pub type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorEvent {
    Ready,
    ContentChange,
    Error,
}

impl EditorEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::ContentChange => "contentChange",
            Self::Error => "error",
        }
    }
}

/// 第三方编辑器调用抛出的异常
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InstanceError(pub String);

impl InstanceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub trait EditorInstance: Send + Sync {
    fn add_listener(&self, event: EditorEvent, listener: Listener);
    fn get_content(&self) -> String;
    fn set_content(&self, html: &str) -> Result<(), InstanceError>;
    fn destroy(&self) -> Result<(), InstanceError>;
}

/// 编辑器库暴露的全局工厂，对应 `getEditor(containerId, config)`
pub trait EditorFactory: Send + Sync {
    fn get_editor(
        &self,
        container_id: &str,
        config: &EditorConfig,
    ) -> Result<Arc<dyn EditorInstance>, InstanceError>;
}

/// 进程级全局对象表
pub trait GlobalRegistry: Send + Sync {
    fn has_global(&self, name: &str) -> bool;

    /// 工厂函数可调用时返回 Some
    fn editor_factory(&self) -> Option<Arc<dyn EditorFactory>>;
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
