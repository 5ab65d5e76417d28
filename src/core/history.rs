use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use chrono::Local;
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::error::TransferResult;

/// 已完成传输的持久化记录，写入后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub file_name: String,
    pub path: String,
    pub url: String,
    pub timestamp: String,
}

/// 访问过的页面记录，与传输记录各用一个存储实例
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationRecord {
    pub url: String,
    pub timestamp: String,
}

/// 传输历史默认文件名
pub const DOWNLOAD_HISTORY_FILE: &str = "download_history.json";
/// 浏览历史默认文件名
pub const NAVIGATION_HISTORY_FILE: &str = "history.json";

/// 本地时间，固定格式，秒精度
pub fn timestamp_now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// 只追加的历史存储，每种记录类型一个实例
///
/// 每次 append 都整读整写一遍文件。下载和浏览都是人工驱动的低频事件，
/// 这里不需要增量写入。文件缺失或损坏按空序列处理，只记日志。
pub struct HistoryStore<R> {
    path: PathBuf,
    _record: PhantomData<R>,
}

impl<R> HistoryStore<R>
where
    R: Serialize + DeserializeOwned,
{
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 按原始追加顺序读出全部记录，存储不可用时返回空序列
    pub fn load_all(&self) -> Vec<R> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("读取历史文件失败 {}: {}", self.path.display(), e);
                }
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<R>>(&data) {
            Ok(records) => records,
            Err(e) => {
                // 损坏的文件当作空历史，下次 append 时会被覆盖
                error!("历史文件损坏 {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// 追加一条记录并整体重写文件
    pub fn append(&self, record: R) -> TransferResult<()> {
        let mut records = self.load_all();
        records.push(record);
        let json = serde_json::to_string_pretty(&records)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, json)?;
        Ok(())
    }
}
