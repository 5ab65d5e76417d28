//! 展示适配层：历史浏览列表的文本格式与终端输出辅助

use crate::core::history::{NavigationRecord, TransferRecord};

pub fn print_success(message: &str) {
    println!("✓ {}", message);
}

pub fn print_error(message: &str) {
    println!("✗ {}", message);
}

/// 下载历史列表的单行文本
pub fn transfer_line(record: &TransferRecord) -> String {
    format!("{} - {} - {}", record.timestamp, record.file_name, record.path)
}

/// 浏览历史列表的单行文本
pub fn navigation_line(record: &NavigationRecord) -> String {
    format!("{} - {}", record.timestamp, record.url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_line() {
        let record = TransferRecord {
            file_name: "x.pdf".to_string(),
            path: "/abs/path/x.pdf".to_string(),
            url: "https://example.com/x.pdf".to_string(),
            timestamp: "2026-08-27 10:00:00".to_string(),
        };
        assert_eq!(transfer_line(&record), "2026-08-27 10:00:00 - x.pdf - /abs/path/x.pdf");
    }

    #[test]
    fn test_navigation_line() {
        let record = NavigationRecord {
            url: "https://example.com".to_string(),
            timestamp: "2026-08-27 10:00:00".to_string(),
        };
        assert_eq!(navigation_line(&record), "2026-08-27 10:00:00 - https://example.com");
    }
}
