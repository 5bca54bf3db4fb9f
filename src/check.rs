use std::path::Path;

use crate::config::{BootstrapConfig, ResourceConfig};

pub struct CheckResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// 超过该时长的轮询预算基本意味着配置写错了
const POLL_BUDGET_WARN_SECS: u64 = 10;

/// 检查配置文件，依次验证资源地址、全局对象名和轮询参数
pub fn run(config_path: &Path) -> CheckResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !config_path.exists() {
        errors.push(format!("缺少配置文件 {}", config_path.display()));
        return CheckResult { errors, warnings };
    }

    match BootstrapConfig::load(config_path) {
        Ok(config) => check_config(&config, &mut errors, &mut warnings),
        Err(e) => errors.push(e.to_string()),
    }

    CheckResult { errors, warnings }
}

pub fn check_config(config: &BootstrapConfig, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    check_resources(config, errors, warnings);
    check_globals(config, errors);
    check_poll(config, errors, warnings);
}

fn check_resources(config: &BootstrapConfig, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    let res = &config.resources;
    let named = [
        ("stylesheet", &res.stylesheet),
        ("config_script", &res.config_script),
        ("library", &res.library),
        ("core", &res.core),
    ];
    for (name, url) in named {
        if url.trim().is_empty() {
            errors.push(format!("resources.{name} 不能为空"));
        }
    }

    let base = res.base_url.trim();
    if !base.is_empty() && reqwest::Url::parse(base).is_err() {
        errors.push(format!("resources.base_url 不是有效的 URL：{base}"));
    }

    for resource in res.required().into_iter().chain(res.extension()) {
        let url = &resource.url;
        if url.contains("://") && reqwest::Url::parse(url).is_err() {
            errors.push(format!("资源地址不是有效的 URL：{url}"));
        }
    }

    let relative = relative_urls(res);
    if !relative.is_empty() {
        warnings.push(format!(
            "{} 等资源解析后仍是相对地址，只能在浏览器中加载，probe 需要设置 resources.base_url 或 --base-url",
            relative[0]
        ));
    }

    if res.extension().is_none() {
        warnings.push("未配置扩展包，编辑器将只有基础功能".to_string());
    }

    let mut seen = std::collections::HashSet::new();
    for resource in res.required() {
        if !resource.url.is_empty() && !seen.insert(resource.url.clone()) {
            warnings.push(format!("资源地址重复，只会加载一次：{}", resource.url));
        }
    }
}

/// 解析后仍不是绝对地址的资源（没有 scheme），无法在浏览器外请求
pub fn relative_urls(res: &ResourceConfig) -> Vec<String> {
    res.required()
        .into_iter()
        .chain(res.extension())
        .map(|r| r.url)
        .filter(|url| !url.is_empty() && !url.contains("://"))
        .collect()
}

fn check_globals(config: &BootstrapConfig, errors: &mut Vec<String>) {
    for name in config.globals.all() {
        if name.trim().is_empty() {
            errors.push("globals 中的全局对象名不能为空".to_string());
            break;
        }
    }
}

fn check_poll(config: &BootstrapConfig, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    let poll = &config.poll;
    if poll.max_attempts == 0 {
        errors.push("poll.max_attempts 必须大于 0".to_string());
    }
    if poll.interval_ms == 0 {
        warnings.push("poll.interval_ms 为 0，轮询之间不会让出时间".to_string());
    }
    if poll.budget().as_secs() > POLL_BUDGET_WARN_SECS {
        warnings.push(format!(
            "轮询总时长 {}ms 超过 {POLL_BUDGET_WARN_SECS}s",
            poll.budget().as_millis()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(toml: &str) -> (Vec<String>, Vec<String>) {
        let config = BootstrapConfig::parse(toml).unwrap();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        check_config(&config, &mut errors, &mut warnings);
        (errors, warnings)
    }

    #[test]
    fn complete_config_passes() {
        let (errors, warnings) = check(
            r#"
[resources]
base_url = "https://cdn.example.com"
stylesheet = "/a.css"
config_script = "/config.js"
library = "/jquery.js"
core = "/core.js"
extension = "/ext.js"
"#,
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn reports_empty_core_and_zero_attempts() {
        let (errors, warnings) = check(
            r#"
[resources]
stylesheet = "/a.css"
config_script = "/config.js"
library = "/jquery.js"
core = ""

[poll]
max_attempts = 0
"#,
        );
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(errors[0].contains("resources.core"));
        assert!(warnings.iter().any(|w| w.contains("扩展包")));
    }

    #[test]
    fn warns_on_long_poll_budget() {
        let (_, warnings) = check(
            r#"
[resources]
base_url = "https://cdn.example.com"
stylesheet = "/a.css"
config_script = "/config.js"
library = "/jquery.js"
core = "/core.js"
extension = "/ext.js"

[poll]
interval_ms = 1000
max_attempts = 60
"#,
        );
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("60000ms"));
    }

    #[test]
    fn relative_urls_without_base_are_flagged() {
        let (errors, warnings) = check(
            r#"
[resources]
stylesheet = "/a.css"
config_script = "/config.js"
library = "https://code.example.org/jquery.min.js"
core = "/core.js"
extension = "/ext.js"
"#,
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].contains("/a.css"));
        assert!(warnings[0].contains("--base-url"));

        let config = BootstrapConfig::parse(
            "[resources]\nstylesheet = \"/a.css\"\nconfig_script = \"/config.js\"\nlibrary = \"https://code.example.org/jquery.min.js\"\ncore = \"/core.js\"\n",
        )
        .unwrap();
        assert_eq!(
            relative_urls(&config.resources),
            vec!["/a.css", "/config.js", "/core.js"]
        );
    }

    #[test]
    fn malformed_absolute_url_is_an_error() {
        let (errors, _) = check(
            r#"
[resources]
base_url = "https://cdn.example.com"
stylesheet = "/a.css"
config_script = "/config.js"
library = "http://exa mple.org/jquery.js"
core = "/core.js"
"#,
        );
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].contains("exa mple.org"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = run(Path::new("/nonexistent/ueboot.toml"));
        assert_eq!(result.errors.len(), 1);
    }
}
