use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::resource::Resource;

pub const CONFIG_FILE: &str = "ueboot.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    pub resources: ResourceConfig,
    #[serde(default)]
    pub globals: GlobalNames,
    #[serde(default)]
    pub poll: PollConfig,
    /// 实例化编辑器时的默认配置，调用方覆盖项优先
    #[serde(default)]
    pub editor: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    /// 相对 URL 的解析基址，为空时原样使用
    #[serde(default)]
    pub base_url: String,
    pub stylesheet: String,
    pub config_script: String,
    pub library: String,
    pub core: String,
    #[serde(default)]
    pub extension: Option<String>,
}

/// 判断资源是否已存在时检查的全局对象名
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalNames {
    #[serde(default = "default_editor_global")]
    pub editor: String,
    #[serde(default = "default_config_global")]
    pub config: String,
    #[serde(default = "default_library_global")]
    pub library: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl BootstrapConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("读取 {} 失败：{}", path.display(), e))?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("解析 {} 失败：{}", path.display(), e))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 给定资源地址，其余各项取默认值
    pub fn with_resources(resources: ResourceConfig) -> Self {
        Self {
            resources,
            globals: GlobalNames::default(),
            poll: PollConfig::default(),
            editor: serde_json::Map::new(),
            server: ServerConfig::default(),
        }
    }
}

impl ResourceConfig {
    /// 必需资源，按加载顺序排列：样式表、配置脚本、通用库、编辑器核心
    pub fn required(&self) -> Vec<Resource> {
        vec![
            Resource::stylesheet(self.resolve(&self.stylesheet)),
            Resource::script(self.resolve(&self.config_script)),
            Resource::script(self.resolve(&self.library)),
            Resource::script(self.resolve(&self.core)),
        ]
    }

    pub fn extension(&self) -> Option<Resource> {
        self.extension
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|url| Resource::script(self.resolve(url)))
    }

    pub fn resolve(&self, url: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.is_empty() || url.contains("://") {
            return url.to_string();
        }
        if url.starts_with('/') {
            format!("{base}{url}")
        } else {
            format!("{base}/{url}")
        }
    }
}

impl GlobalNames {
    pub fn all(&self) -> [&str; 3] {
        [
            self.editor.as_str(),
            self.config.as_str(),
            self.library.as_str(),
        ]
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn budget(&self) -> Duration {
        self.interval() * self.max_attempts
    }
}

// 默认值函数
fn default_editor_global() -> String { "UE".into() }
fn default_config_global() -> String { "UEDITOR_CONFIG".into() }
fn default_library_global() -> String { "jQuery".into() }
fn default_interval_ms() -> u64 { 100 }
fn default_max_attempts() -> u32 { 30 }
fn default_log_level() -> String { "info".into() }

impl Default for GlobalNames {
    fn default() -> Self {
        Self {
            editor: default_editor_global(),
            config: default_config_global(),
            library: default_library_global(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[resources]
base_url = "https://cdn.example.com/"
stylesheet = "/ueditor/themes/default/css/ueditor.css"
config_script = "ueditor/ueditor.config.js"
library = "https://code.example.org/jquery.min.js"
core = "/ueditor/ueditor.all.js"
extension = ""

[editor]
initialFrameHeight = 400
"#;

    #[test]
    fn parses_with_defaults() {
        let config = BootstrapConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.globals.editor, "UE");
        assert_eq!(config.poll.max_attempts, 30);
        assert_eq!(config.poll.budget(), Duration::from_secs(3));
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.editor["initialFrameHeight"], 400);
    }

    #[test]
    fn required_resources_keep_load_order() {
        let config = BootstrapConfig::parse(SAMPLE).unwrap();
        let urls: Vec<String> = config
            .resources
            .required()
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://cdn.example.com/ueditor/themes/default/css/ueditor.css",
                "https://cdn.example.com/ueditor/ueditor.config.js",
                "https://code.example.org/jquery.min.js",
                "https://cdn.example.com/ueditor/ueditor.all.js",
            ]
        );
    }

    #[test]
    fn blank_extension_is_ignored() {
        let config = BootstrapConfig::parse(SAMPLE).unwrap();
        assert!(config.resources.extension().is_none());
    }

    #[test]
    fn missing_resources_section_fails() {
        assert!(BootstrapConfig::parse("[poll]\ninterval_ms = 50\n").is_err());
    }
}
