use async_trait::async_trait;
use std::time::Duration;

use crate::resource::{Resource, ResourceLoader};

/// 通过 HTTP GET 验证资源可访问，任意 2xx 视为加载成功
pub struct HttpResourceLoader {
    client: reqwest::Client,
}

impl HttpResourceLoader {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ueboot/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| anyhow::anyhow!("创建 HTTP 客户端失败：{}", e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ResourceLoader for HttpResourceLoader {
    async fn load(&self, resource: &Resource) -> Result<(), String> {
        let url = reqwest::Url::parse(&resource.url)
            .map_err(|e| format!("无效的 URL：{e}"))?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("请求失败：{e}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }
        tracing::debug!("{} {} -> {}", resource.kind, resource.url, status);
        Ok(())
    }
}
