use thiserror::Error;
use std::io;
use crate::core::engine::TransferHandle;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("重复的下载句柄: {0:?}")]
    AlreadyTracked(TransferHandle),

    #[error("IO错误: {0}")]
    IoError(#[from] io::Error),

    #[error("历史记录序列化失败: {0}")]
    PersistError(#[from] serde_json::Error),

    #[error("配置无效: {0}")]
    InvalidConfig(String),

    #[error("未知错误: {0}")]
    Unknown(String),
}

impl TransferError {
    /// 引擎协议违规（如重复句柄）只记日志，绝不中断事件循环
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, TransferError::AlreadyTracked(_))
    }
}

impl From<String> for TransferError {
    fn from(error: String) -> Self {
        TransferError::Unknown(error)
    }
}

impl From<&str> for TransferError {
    fn from(error: &str) -> Self {
        TransferError::Unknown(error.to_string())
    }
}

pub type TransferResult<T> = Result<T, TransferError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_violation() {
        let dup = TransferError::AlreadyTracked(TransferHandle(7));
        assert!(dup.is_protocol_violation());

        let io = TransferError::IoError(io::Error::new(io::ErrorKind::Other, "disk"));
        assert!(!io.is_protocol_violation());
    }

    #[test]
    fn test_error_conversion() {
        let error: TransferError = "测试错误".into();
        assert!(matches!(error, TransferError::Unknown(_)));

        let error: TransferError = "测试错误".to_string().into();
        assert!(matches!(error, TransferError::Unknown(_)));
    }
}
