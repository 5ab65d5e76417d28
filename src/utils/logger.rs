use actix::prelude::*;
use chrono::Local;
use log::LevelFilter;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 单文件日志轮转上限
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// 日志消息
pub struct LogMsg {
    pub level: LevelFilter,
    pub message: String,
}
impl Message for LogMsg { type Result = (); }

/// 文件日志 Actor
///
/// 状态栏和下载事件都在事件循环里，日志写盘走独立 actor 避免阻塞。
pub struct LoggerActor {
    file: File,
    path: PathBuf,
    level: LevelFilter,
    written: u64,
}

impl LoggerActor {
    pub fn new<P: AsRef<Path>>(path: P, level: LevelFilter) -> Result<Self, std::io::Error> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = Self::open(&path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self { file, path, level, written })
    }

    fn open(path: &Path) -> Result<File, std::io::Error> {
        OpenOptions::new().create(true).append(true).open(path)
    }

    /// 超过上限时把当前文件挪到 .old 并重新打开
    fn rotate_if_needed(&mut self) -> Result<(), std::io::Error> {
        if self.written <= MAX_LOG_SIZE {
            return Ok(());
        }
        let old = self.path.with_extension("log.old");
        let _ = std::fs::remove_file(&old);
        std::fs::rename(&self.path, &old)?;
        self.file = Self::open(&self.path)?;
        self.written = 0;
        Ok(())
    }

    fn write_line(&mut self, level: LevelFilter, message: &str) -> Result<(), std::io::Error> {
        if level > self.level {
            return Ok(());
        }
        self.rotate_if_needed()?;
        let line = format!("{} [{}] - {}\n", Local::now().format("%Y-%m-%d %H:%M:%S"), level, message);
        self.file.write_all(line.as_bytes())?;
        self.written += line.len() as u64;
        Ok(())
    }
}

impl Actor for LoggerActor {
    type Context = Context<Self>;
}

impl Handler<LogMsg> for LoggerActor {
    type Result = ();
    fn handle(&mut self, msg: LogMsg, _ctx: &mut Self::Context) {
        if let Err(e) = self.write_line(msg.level, &msg.message) {
            eprintln!("日志写入失败: {}", e);
        }
    }
}

// 便捷的日志方法 - 为Addr<LoggerActor>提供扩展方法
pub trait LoggerExt {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
}

impl LoggerExt for Addr<LoggerActor> {
    fn info(&self, message: &str) {
        self.do_send(LogMsg { level: LevelFilter::Info, message: message.to_string() });
    }

    fn error(&self, message: &str) {
        self.do_send(LogMsg { level: LevelFilter::Error, message: message.to_string() });
    }

    fn warn(&self, message: &str) {
        self.do_send(LogMsg { level: LevelFilter::Warn, message: message.to_string() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_logger_writes_lines() {
        let path = std::env::temp_dir()
            .join(format!("tailsdown_log_{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let logger = LoggerActor::new(&path, LevelFilter::Info).unwrap().start();
        logger.info("第一条");
        logger.error("第二条");
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[INFO] - 第一条"));
        assert!(content.contains("[ERROR] - 第二条"));

        let _ = std::fs::remove_file(&path);
    }

    #[actix_rt::test]
    async fn test_logger_filters_below_level() {
        let path = std::env::temp_dir()
            .join(format!("tailsdown_log_filter_{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let logger = LoggerActor::new(&path, LevelFilter::Error).unwrap().start();
        logger.info("不应出现");
        logger.error("应出现");
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("不应出现"));
        assert!(content.contains("应出现"));

        let _ = std::fs::remove_file(&path);
    }
}
