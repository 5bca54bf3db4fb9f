use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use ueboot::config::{self, BootstrapConfig};
use ueboot::probe::ProbeOutcome;
use ueboot::resource::{HttpResourceLoader, ResourceCache};
use ueboot::{check, init, probe};

#[derive(Parser)]
#[command(name = "ueboot", about = "后台富文本编辑器加载器", version = long_version())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 生成默认配置文件
    Init {
        /// 配置文件路径
        #[arg(short, long, default_value = config::CONFIG_FILE)]
        config: PathBuf,
    },

    /// 检查配置文件
    Check {
        /// 配置文件路径
        #[arg(short, long, default_value = config::CONFIG_FILE)]
        config: PathBuf,
    },

    /// 按加载顺序请求每个编辑器资源，确认部署可用
    Probe {
        /// 配置文件路径
        #[arg(short, long, default_value = config::CONFIG_FILE)]
        config: PathBuf,

        /// 覆盖配置中的 resources.base_url
        #[arg(long)]
        base_url: Option<String>,

        /// 以 JSON 输出探测结果
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 配置可读时使用其中的日志级别作为默认值
    let config_path = match &cli.command {
        Commands::Init { config } | Commands::Check { config } | Commands::Probe { config, .. } => {
            config.clone()
        }
    };
    let default_level = BootstrapConfig::load(&config_path)
        .ok()
        .map(|c| c.server.log_level);
    let default_level = default_level.as_deref().unwrap_or("info");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Init { config } => {
            if init::ensure_config(&config)? {
                tracing::info!("已生成默认配置：{}", config.display());
            } else {
                tracing::info!("配置文件已存在：{}", config.display());
            }
        }
        Commands::Check { config } => {
            let result = check::run(&config);

            for w in &result.warnings {
                tracing::warn!("{w}");
            }
            for e in &result.errors {
                tracing::error!("{e}");
            }

            if result.errors.is_empty() {
                tracing::info!("检查通过（{} 个警告）", result.warnings.len());
            } else {
                anyhow::bail!(
                    "检查未通过：{} 个错误，{} 个警告",
                    result.errors.len(),
                    result.warnings.len()
                );
            }
        }
        Commands::Probe {
            config,
            base_url,
            json,
        } => {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(run_probe(&config, base_url, json))?;
        }
    }

    Ok(())
}

async fn run_probe(config_path: &Path, base_url: Option<String>, json: bool) -> anyhow::Result<()> {
    let mut config = BootstrapConfig::load(config_path)?;
    if let Some(base) = base_url {
        config.resources.base_url = base;
    }

    let relative = check::relative_urls(&config.resources);
    if !relative.is_empty() {
        anyhow::bail!(
            "无法请求相对地址 {}，请在配置中设置 resources.base_url 或使用 --base-url",
            relative.join("、")
        );
    }

    let loader = HttpResourceLoader::new()?;
    let report = probe::run(&config.resources, &loader, &ResourceCache::global()).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for outcome in &report.outcomes {
            match outcome {
                ProbeOutcome::Loaded { url } => tracing::info!("可用：{url}"),
                ProbeOutcome::Degraded { url, cause } => tracing::warn!("不可用（非必需）：{url}：{cause}"),
                ProbeOutcome::Failed { url, cause } => tracing::error!("不可用：{url}：{cause}"),
                ProbeOutcome::Skipped { url } => tracing::warn!("已跳过：{url}"),
            }
        }
    }

    if report.is_fatal() {
        anyhow::bail!("必需资源不可用，编辑器将无法加载");
    }
    tracing::info!("全部必需资源可用");
    Ok(())
}

const fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\ncommit:  ",
        env!("UEBOOT_GIT_COMMIT"),
        "\nbuild:   ",
        env!("UEBOOT_BUILD_TIME"),
        "\ntarget:  ",
        env!("UEBOOT_BUILD_TARGET"),
        "\nprofile: ",
        env!("UEBOOT_BUILD_PROFILE"),
    )
}
