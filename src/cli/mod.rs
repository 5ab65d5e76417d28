//! CLI: 命令行接口和参数解析模块
//!
//! ## 主要功能
//!
//! - 命令行参数解析和验证
//! - 配置文件路径管理与编辑器集成
//! - 历史文件查看入口（下载历史 / 浏览历史）
//! - 状态栏演示模式入口
//!
//! ## 支持的命令
//!
//! - 查看下载历史：`tailsdown --downloads`
//! - 查看浏览历史：`tailsdown --visits`
//! - 状态栏演示：`tailsdown --simulate`
//! - 编辑配置：`tailsdown -e`
//! - 指定配置：`tailsdown -c config.conf --downloads`

use clap::Parser;
use std::env;
use std::path::Path;

use crate::config::Config;
use crate::core::error::TransferError;

/// 获取平台默认配置文件路径
pub fn default_config_path() -> String {
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
        format!("{}/tailsdown/tailsdown.conf", appdata)
    }
    #[cfg(target_os = "macos")]
    {
        let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        format!("{}/Library/Application Support/tailsdown/tailsdown.conf", home)
    }
    #[cfg(target_os = "linux")]
    {
        let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        format!("{}/.config/tailsdown/tailsdown.conf", home)
    }
}

/// 打开配置文件编辑器
pub fn open_config_in_editor(config_path: &str) {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("notepad").arg(config_path).status().ok();
    }
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg("-e").arg(config_path).status().ok();
    }
    #[cfg(target_os = "linux")]
    {
        // 优先 xdg-open，否则 nano
        if std::process::Command::new("xdg-open").arg(config_path).status().is_err() {
            let _ = std::process::Command::new("nano").arg(config_path).status();
        }
    }
}

/// Tailsdown 命令行参数
///
/// 示例用法：
///   tailsdown --downloads
///   tailsdown --visits
///   tailsdown --simulate
///   tailsdown -e  # 编辑配置文件
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tailsdown",
    version = env!("CARGO_PKG_VERSION"),
    about = "Tails 浏览器的下载生命周期与状态栏管理器",
    long_about = "跟踪内嵌引擎的下载进度与速度、聚合状态栏文本并持久化下载/浏览历史。\n\n示例：\n  tailsdown --downloads\n  tailsdown --visits\n  tailsdown --simulate\n  tailsdown -c /path/to/config.conf --downloads\n"
)]
pub struct Args {
    /// 列出下载历史并退出
    #[arg(long, help = "列出已完成的下载记录。")]
    pub downloads: bool,

    /// 列出浏览历史并退出
    #[arg(long, help = "列出访问过的页面记录。")]
    pub visits: bool,

    /// 运行一次模拟传输，在终端演示状态栏
    #[arg(long, help = "用模拟引擎事件演示状态栏的聚合与安静期清除。")]
    pub simulate: bool,

    /// 配置文件路径，默认为平台推荐路径
    #[arg(short = 'c', long, default_value_t = default_config_path(), help = "配置文件路径，默认为平台推荐路径。")]
    pub config: String,

    /// 编辑配置文件（-e 或 --edit）
    #[arg(short = 'e', long = "edit", help = "用系统默认编辑器打开配置文件并退出。")]
    pub edit_config: bool,

    /// 指定保存目录，覆盖配置文件中的设置
    #[arg(long, short = 'd', help = "指定默认保存目录，覆盖配置文件中的设置。")]
    pub download_dir: Option<String>,

    /// 指定下载历史文件路径
    #[arg(long, help = "指定下载历史文件路径，覆盖配置文件中的设置。")]
    pub download_history: Option<String>,

    /// 指定浏览历史文件路径
    #[arg(long, help = "指定浏览历史文件路径，覆盖配置文件中的设置。")]
    pub history: Option<String>,
}

impl Args {
    /// 解析命令行参数并加载配置
    pub fn parse_args() -> Result<(Self, Config), TransferError> {
        let args = Args::parse();

        if args.edit_config {
            open_config_in_editor(&args.config);
            std::process::exit(0);
        }

        // 加载或创建配置文件
        let mut config = if Path::new(&args.config).exists() {
            Config::load(&args.config)?
        } else {
            if let Some(parent) = Path::new(&args.config).parent() {
                std::fs::create_dir_all(parent)?;
            }
            let config = Config::default();
            config.save_with_template(&args.config)?;
            config
        };

        config.merge_from_args(&args);
        config.validate()?;

        Ok((args, config))
    }
}
