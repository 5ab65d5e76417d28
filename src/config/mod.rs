use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::TransferError;
use crate::core::history::{DOWNLOAD_HISTORY_FILE, NAVIGATION_HISTORY_FILE};

/// 配置结构体
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// 默认保存目录
    pub download_dir: String,
    /// 下载历史文件路径
    pub download_history_file: String,
    /// 浏览历史文件路径
    pub history_file: String,
    /// 传输完成后状态栏安静期（秒）
    pub status_clear_secs: u64,
    /// 日志文件路径
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_dir: "./downloads".to_string(),
            download_history_file: DOWNLOAD_HISTORY_FILE.to_string(),
            history_file: NAVIGATION_HISTORY_FILE.to_string(),
            status_clear_secs: 5,
            log_file: "logs/tailsdown.log".to_string(),
        }
    }
}

impl Config {
    /// 加载配置文件，缺失或损坏时回退到默认值并重写模板
    pub fn load(path: &str) -> Result<Self, TransferError> {
        if Path::new(path).exists() {
            let content = fs::read_to_string(path)?;
            match toml::from_str(&content) {
                Ok(config) => Ok(config),
                Err(e) => {
                    eprintln!("配置文件格式错误: {}，将使用默认配置", e);
                    let config = Config::default();
                    config.save_with_template(path)?;
                    Ok(config)
                }
            }
        } else {
            let config = Config::default();
            config.save_with_template(path)?;
            Ok(config)
        }
    }

    /// 保存带注释模板的配置文件（唯一写入方法）
    pub fn save_with_template(&self, path: &str) -> Result<(), TransferError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let config_content = toml::to_string_pretty(self)
            .map_err(|e| TransferError::Unknown(format!("无法序列化配置: {}", e)))?;
        let full_content = format!("{}\n{}", Config::template_header(), config_content);
        fs::write(path, full_content)?;
        Ok(())
    }

    fn template_header() -> String {
        r#"# Tailsdown 配置文件
# ====================
#
# Tails 浏览器下载与状态栏管理器的 TOML 配置。
# 命令行参数会覆盖这里的设置，优先级：命令行 > 配置文件 > 默认值。
#
# download_dir          默认保存目录（--simulate 演示也写到这里）
# download_history_file 下载历史 JSON 文件，默认在进程工作目录
# history_file          浏览历史 JSON 文件，默认在进程工作目录
# status_clear_secs     传输完成后多少秒清除状态栏的传输片段
# log_file              文件日志路径
"#
        .to_string()
    }

    /// 校验配置合法性
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.download_dir.is_empty() {
            return Err(TransferError::InvalidConfig("下载目录不能为空".to_string()));
        }
        if self.download_history_file.is_empty() {
            return Err(TransferError::InvalidConfig("下载历史文件路径不能为空".to_string()));
        }
        if self.history_file.is_empty() {
            return Err(TransferError::InvalidConfig("浏览历史文件路径不能为空".to_string()));
        }
        if self.download_history_file == self.history_file {
            return Err(TransferError::InvalidConfig(
                "下载历史和浏览历史必须是两个独立文件".to_string(),
            ));
        }
        if self.status_clear_secs == 0 {
            return Err(TransferError::InvalidConfig("安静期必须大于0秒".to_string()));
        }
        Ok(())
    }

    /// 合并命令行参数到配置
    pub fn merge_from_args(&mut self, args: &crate::cli::Args) {
        if let Some(dir) = &args.download_dir {
            self.download_dir = dir.clone();
        }
        if let Some(path) = &args.download_history {
            self.download_history_file = path.clone();
        }
        if let Some(path) = &args.history {
            self.history_file = path.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.download_history_file, "download_history.json");
        assert_eq!(config.history_file, "history.json");
        assert_eq!(config.status_clear_secs, 5);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.status_clear_secs = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.history_file = config.download_history_file.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_load() {
        let path = format!(
            "{}/tailsdown_test_config_{}.toml",
            std::env::temp_dir().display(),
            std::process::id()
        );
        let config = Config::default();
        config.save_with_template(&path).expect("保存配置失败");

        let loaded = Config::load(&path).expect("加载配置失败");
        assert_eq!(loaded.download_history_file, config.download_history_file);
        assert_eq!(loaded.status_clear_secs, config.status_clear_secs);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Tailsdown 配置文件"));

        let _ = fs::remove_file(&path);
    }
}
