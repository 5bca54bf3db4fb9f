pub mod cache;
pub mod http;

use async_trait::async_trait;
use std::fmt;

pub use cache::{LoadError, ResourceCache};
pub use http::HttpResourceLoader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Stylesheet,
    Script,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stylesheet => f.write_str("样式表"),
            Self::Script => f.write_str("脚本"),
        }
    }
}

/// 一个可加载的外部资源
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    pub url: String,
    pub kind: ResourceKind,
}

impl Resource {
    pub fn new(url: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    pub fn script(url: impl Into<String>) -> Self {
        Self::new(url, ResourceKind::Script)
    }

    pub fn stylesheet(url: impl Into<String>) -> Self {
        Self::new(url, ResourceKind::Stylesheet)
    }
}

/// 资源宿主：注入 `<script>`/`<link>` 或发起网络请求
///
/// 每次调用恰好结束一次，成功返回 `Ok(())`，失败返回可读的原因。
/// 去重由 [`ResourceCache`] 负责，实现方无需处理。
#[async_trait]
pub trait ResourceLoader: Send + Sync {
    async fn load(&self, resource: &Resource) -> Result<(), String>;
}
