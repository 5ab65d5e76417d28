//! 引擎适配层：core 只通过这里的 trait 与内嵌网页引擎交互，
//! 不依赖引擎的具体下载项类型

use std::path::{Path, PathBuf};

/// 单次传输的不透明标识，由引擎分配
///
/// 引擎保证同一句柄在传输完成前不会复用；完成回调处理后方可复用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferHandle(pub u64);

/// 引擎下载项的最小访问面
///
/// 实现方持有引擎的具体下载对象，core 只调用这四个方法。
pub trait EngineDownload: Send {
    /// 下载来源 URL
    fn source_url(&self) -> String;
    /// 设置保存路径（必须在 accept 之前调用）
    fn set_destination(&self, path: &Path);
    /// 接受下载，引擎开始写入
    fn accept(&self);
    /// 取消下载，引擎不产生任何后续回调
    fn cancel(&self);
}

/// 保存位置选择器（同步协作方）
///
/// 返回 `None` 表示用户取消，此时整个传输在边界处终止，不留任何状态。
pub trait SavePrompt: Send {
    fn choose_save_path(&self, suggested_name: &str) -> Option<PathBuf>;
}

/// 总在固定目录保存的选择器，用于演示与测试
pub struct FixedDirPrompt {
    pub dir: PathBuf,
}

impl SavePrompt for FixedDirPrompt {
    fn choose_save_path(&self, suggested_name: &str) -> Option<PathBuf> {
        let name = if suggested_name.is_empty() { "download" } else { suggested_name };
        Some(self.dir.join(name))
    }
}

/// 从来源 URL 的最后一段路径推断文件名，推断失败返回 None
pub fn file_name_from_url(source_url: &str) -> Option<String> {
    let parsed = url::Url::parse(source_url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    Some(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("https://example.com/files/report.pdf"),
            Some("report.pdf".to_string())
        );
        assert_eq!(
            file_name_from_url("https://example.com/files/"),
            Some("files".to_string())
        );
        assert_eq!(file_name_from_url("https://example.com"), None);
        assert_eq!(file_name_from_url("not a url"), None);
    }

    #[test]
    fn test_fixed_dir_prompt() {
        let prompt = FixedDirPrompt { dir: PathBuf::from("/tmp/downloads") };
        assert_eq!(
            prompt.choose_save_path("a.pdf"),
            Some(PathBuf::from("/tmp/downloads/a.pdf"))
        );
        assert_eq!(
            prompt.choose_save_path(""),
            Some(PathBuf::from("/tmp/downloads/download"))
        );
    }
}
