use serde::Serialize;

use crate::config::ResourceConfig;
use crate::resource::{ResourceCache, ResourceKind, ResourceLoader};

/// 单个资源的探测结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Loaded { url: String },
    /// 可选资源或样式表失败，编辑器仍可工作
    Degraded { url: String, cause: String },
    /// 必需脚本失败，编辑器无法加载
    Failed { url: String, cause: String },
    /// 之前的必需脚本已失败，未探测
    Skipped { url: String },
}

#[derive(Debug, Default, Serialize)]
pub struct ProbeReport {
    pub outcomes: Vec<ProbeOutcome>,
}

impl ProbeReport {
    pub fn is_fatal(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o, ProbeOutcome::Failed { .. }))
    }
}

/// 按加载器的顺序与判定规则逐个探测资源
pub async fn run(
    resources: &ResourceConfig,
    loader: &dyn ResourceLoader,
    cache: &ResourceCache,
) -> ProbeReport {
    let mut report = ProbeReport::default();
    let mut failed = false;

    let sequence = resources
        .required()
        .into_iter()
        .map(|r| (r, true))
        .chain(resources.extension().map(|r| (r, false)));

    for (resource, required) in sequence {
        if failed {
            report.outcomes.push(ProbeOutcome::Skipped { url: resource.url });
            continue;
        }
        let outcome = match cache.load(loader, &resource).await {
            Ok(()) => ProbeOutcome::Loaded { url: resource.url },
            Err(e) if !required || resource.kind == ResourceKind::Stylesheet => {
                ProbeOutcome::Degraded { url: e.url, cause: e.cause }
            }
            Err(e) => {
                failed = true;
                ProbeOutcome::Failed { url: e.url, cause: e.cause }
            }
        };
        report.outcomes.push(outcome);
    }

    report
}
