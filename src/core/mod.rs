//! Core: 传输生命周期跟踪、状态聚合与历史持久化的核心逻辑模块

pub mod engine;
pub mod error;
pub mod history;
pub mod manager;
pub mod navigation;
pub mod status;
pub mod tracker;

// 只导出主流程和其它模块实际用到的类型
pub use engine::{EngineDownload, SavePrompt, TransferHandle};
pub use error::{TransferError, TransferResult};
pub use history::{HistoryStore, NavigationRecord, TransferRecord};
pub use manager::TransferManagerActor;
pub use navigation::NavigationActor;
pub use status::StatusAggregatorActor;
pub use tracker::{ProgressSnapshot, TransferTracker};
