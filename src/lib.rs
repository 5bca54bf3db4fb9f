//! 后台富文本编辑器加载器
//!
//! 按顺序加载编辑器的样式表与脚本（同一 URL 全进程只加载一次），
//! 轮询等待编辑器工厂可用后实例化，并在宿主视图与编辑器之间同步内容。
//! 浏览器全局对象、资源注入与编辑器实例都通过 [`host`] 中的 trait 注入。

pub mod active;
pub mod bootstrap;
pub mod check;
pub mod config;
pub mod host;
pub mod html;
pub mod init;
pub mod insert;
pub mod probe;
pub mod resource;

pub use active::ActiveEditor;
pub use bootstrap::{
    BootstrapError, EditorBootstrap, EditorSession, LifecycleState, MountOptions, OnChange,
};
pub use config::BootstrapConfig;
pub use resource::{Resource, ResourceCache, ResourceKind, ResourceLoader};
