use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use log::warn;

use crate::core::engine::TransferHandle;
use crate::core::error::{TransferError, TransferResult};
use crate::core::history::{timestamp_now, TransferRecord};

/// 单个在途传输的状态，按句柄索引
///
/// 从 accept 到 finished 之间存在，完成回调处理后立即移除。
struct TransferState {
    dest_path: String,
    source_url: String,
    prev_bytes: u64,
    prev_time: Instant,
}

/// 进度快照，交给调用方格式化
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub file_name: String,
    pub percent: u64,
    pub speed_kbps: f64,
}

impl ProgressSnapshot {
    fn zero() -> Self {
        Self {
            file_name: String::new(),
            percent: 0,
            speed_kbps: 0.0,
        }
    }
}

/// 传输生命周期跟踪器
///
/// 所有操作都是输入上的全函数：未知或重复句柄退化为空操作或零值结果，
/// 绝不 panic。状态只通过这里的方法修改。
pub struct TransferTracker {
    states: HashMap<TransferHandle, TransferState>,
}

impl TransferTracker {
    pub fn new() -> Self {
        Self { states: HashMap::new() }
    }

    /// 登记一个新传输，初始采样为 (0, now)
    pub fn accept(
        &mut self,
        handle: TransferHandle,
        dest_path: &str,
        source_url: &str,
    ) -> TransferResult<()> {
        self.accept_at(handle, dest_path, source_url, Instant::now())
    }

    pub(crate) fn accept_at(
        &mut self,
        handle: TransferHandle,
        dest_path: &str,
        source_url: &str,
        now: Instant,
    ) -> TransferResult<()> {
        if self.states.contains_key(&handle) {
            return Err(TransferError::AlreadyTracked(handle));
        }
        self.states.insert(handle, TransferState {
            dest_path: dest_path.to_string(),
            source_url: source_url.to_string(),
            prev_bytes: 0,
            prev_time: now,
        });
        Ok(())
    }

    /// 处理一次进度回调，返回用于展示的快照
    ///
    /// 未知句柄返回全零快照并且不建立状态（不隐式登记）。
    pub fn on_progress(
        &mut self,
        handle: TransferHandle,
        bytes_received: u64,
        bytes_total: u64,
    ) -> ProgressSnapshot {
        self.on_progress_at(handle, bytes_received, bytes_total, Instant::now())
    }

    pub(crate) fn on_progress_at(
        &mut self,
        handle: TransferHandle,
        bytes_received: u64,
        bytes_total: u64,
        now: Instant,
    ) -> ProgressSnapshot {
        let state = match self.states.get_mut(&handle) {
            Some(state) => state,
            None => {
                warn!("收到未知句柄的进度回调: {:?}", handle);
                return ProgressSnapshot::zero();
            }
        };

        let percent = if bytes_total > 0 {
            ((bytes_received as u128 * 100 / bytes_total as u128) as u64).min(100)
        } else {
            0
        };

        // 瞬时速度：两次采样的字节差除以时间差，时间差不为正时记 0
        let elapsed = now.saturating_duration_since(state.prev_time).as_secs_f64();
        let delta = bytes_received.saturating_sub(state.prev_bytes);
        let speed = if elapsed > 0.0 { delta as f64 / elapsed } else { 0.0 };

        state.prev_bytes = bytes_received;
        state.prev_time = now;

        ProgressSnapshot {
            file_name: file_name_of(&state.dest_path),
            percent,
            speed_kbps: speed / 1024.0,
        }
    }

    /// 处理完成回调：无条件移除句柄，已登记的返回待持久化的记录
    pub fn on_finished(&mut self, handle: TransferHandle) -> Option<TransferRecord> {
        let state = self.states.remove(&handle)?;
        Some(TransferRecord {
            file_name: file_name_of(&state.dest_path),
            path: state.dest_path,
            url: state.source_url,
            timestamp: timestamp_now(),
        })
    }

    /// 当前在途传输数量
    pub fn active_count(&self) -> usize {
        self.states.len()
    }
}

impl Default for TransferTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// 取路径的最后一段作为文件名
pub fn file_name_of(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const H1: TransferHandle = TransferHandle(1);
    const H2: TransferHandle = TransferHandle(2);

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of("/home/user/downloads/x.pdf"), "x.pdf");
        assert_eq!(file_name_of("x.pdf"), "x.pdf");
        assert_eq!(file_name_of("/tmp/dir/"), "dir");
    }

    #[test]
    fn test_accept_duplicate() {
        let mut tracker = TransferTracker::new();
        assert!(tracker.accept(H1, "/tmp/a.zip", "https://example.com/a.zip").is_ok());
        let err = tracker.accept(H1, "/tmp/b.zip", "https://example.com/b.zip");
        assert!(matches!(err, Err(TransferError::AlreadyTracked(_))));
        assert_eq!(tracker.active_count(), 1);
    }

    #[test]
    fn test_percent_monotonic_and_bounded() {
        let mut tracker = TransferTracker::new();
        tracker.accept(H1, "/tmp/a.zip", "https://example.com/a.zip").unwrap();

        let mut last = 0;
        for received in [0u64, 1, 499, 500, 999, 1000] {
            let snap = tracker.on_progress(H1, received, 1000);
            assert!(snap.percent >= last, "百分比必须单调不减");
            assert!(snap.percent <= 100);
            last = snap.percent;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn test_percent_zero_total() {
        let mut tracker = TransferTracker::new();
        tracker.accept(H1, "/tmp/a.zip", "https://example.com/a.zip").unwrap();
        let snap = tracker.on_progress(H1, 4096, 0);
        assert_eq!(snap.percent, 0);
    }

    #[test]
    fn test_unknown_handle_is_zero_and_stateless() {
        let mut tracker = TransferTracker::new();
        let snap = tracker.on_progress(H1, 500, 1000);
        assert_eq!(snap, ProgressSnapshot::zero());
        // 未知句柄不会被隐式登记
        assert!(tracker.on_finished(H1).is_none());
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn test_speed_calculation() {
        let mut tracker = TransferTracker::new();
        let t0 = Instant::now();
        tracker.accept_at(H1, "/tmp/a.zip", "https://example.com/a.zip", t0).unwrap();

        let snap = tracker.on_progress_at(H1, 1000, 10000, t0);
        assert_eq!(snap.speed_kbps, 0.0); // 时间差为 0

        // prev=1000，2 秒后收到 3000：(2000/2)/1024 = 0.9765625
        let snap = tracker.on_progress_at(H1, 3000, 10000, t0 + Duration::from_secs(2));
        assert!((snap.speed_kbps - 0.9765625).abs() < 1e-9);
        assert_eq!(format!("{:.2}", snap.speed_kbps), "0.98");
    }

    #[test]
    fn test_independent_samples_per_handle() {
        let mut tracker = TransferTracker::new();
        let t0 = Instant::now();
        tracker.accept_at(H1, "/tmp/a.zip", "https://example.com/a.zip", t0).unwrap();
        tracker.accept_at(H2, "/tmp/b.zip", "https://example.com/b.zip", t0).unwrap();

        tracker.on_progress_at(H1, 9000, 10000, t0 + Duration::from_secs(1));
        // H1 的进度不影响 H2 的采样基线
        let snap = tracker.on_progress_at(H2, 2048, 10000, t0 + Duration::from_secs(2));
        assert!((snap.speed_kbps - 1.0).abs() < 1e-9);
        assert_eq!(snap.file_name, "b.zip");
    }

    #[test]
    fn test_finished_returns_record_once() {
        let mut tracker = TransferTracker::new();
        tracker.accept(H1, "/tmp/dl/x.pdf", "https://example.com/x.pdf").unwrap();

        let record = tracker.on_finished(H1).expect("已登记的传输应产生记录");
        assert_eq!(record.file_name, "x.pdf");
        assert_eq!(record.path, "/tmp/dl/x.pdf");
        assert_eq!(record.url, "https://example.com/x.pdf");
        assert!(!record.timestamp.is_empty());

        // 幂等：再次完成返回 None，状态已移除
        assert!(tracker.on_finished(H1).is_none());
        assert_eq!(tracker.active_count(), 0);
    }
}
