use anyhow::Result;
use std::fs;
use std::path::Path;

// 嵌入默认 ueboot.toml
const DEFAULT_CONFIG: &str = r#"[resources]
base_url = ""
stylesheet = "/ueditor/themes/default/css/ueditor.css"
config_script = "/ueditor/ueditor.config.js"
library = "/static/js/jquery.min.js"
core = "/ueditor/ueditor.all.min.js"
extension = "/ueditor/xiumi-ue-dialog-v5.js"

[globals]
editor = "UE"
config = "UEDITOR_CONFIG"
library = "jQuery"

[poll]
interval_ms = 100
max_attempts = 30

[editor]
initialFrameHeight = 400
autoHeightEnabled = false
enableAutoSave = false
zIndex = 100

[server]
log_level = "info"
"#;

/// 配置文件不存在时写入默认配置，返回是否写入
pub fn ensure_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| anyhow::anyhow!("写入 {} 失败：{}", path.display(), e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BootstrapConfig;

    #[test]
    fn default_config_parses() {
        let config = BootstrapConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.resources.required().len(), 4);
        assert!(config.resources.extension().is_some());
        assert_eq!(config.editor["initialFrameHeight"], 400);
    }
}
