use actix::prelude::*;
use futures::FutureExt;
use std::time::Duration;
use log::{error, info, warn};

use crate::core::engine::{file_name_from_url, EngineDownload, SavePrompt, TransferHandle};
use crate::core::history::{HistoryStore, TransferRecord};
use crate::core::status::{
    ClearTransferProgressAfter, QueryStatusLine, SetTransferProgress, StatusAggregatorActor,
};
use crate::core::tracker::{file_name_of, TransferTracker};

// ================== 引擎回调对应的消息 ==================

/// 引擎发起一次下载请求
pub struct DownloadRequested {
    pub handle: TransferHandle,
    pub suggested_name: String,
    pub delegate: Box<dyn EngineDownload>,
}
impl Message for DownloadRequested { type Result = (); }

/// 引擎的进度回调，同一句柄按 bytes_received 非降序送达
pub struct DownloadProgress {
    pub handle: TransferHandle,
    pub bytes_received: u64,
    pub bytes_total: u64,
}
impl Message for DownloadProgress { type Result = (); }

/// 引擎的完成回调，每个句柄至多一次且在所有进度之后
pub struct DownloadFinished {
    pub handle: TransferHandle,
}
impl Message for DownloadFinished { type Result = (); }

/// 查询当前状态行文本（转发给聚合器）
pub struct QueryStatusText;
impl Message for QueryStatusText { type Result = String; }

/// 查询在途传输数量
pub struct QueryActiveTransfers;
impl Message for QueryActiveTransfers { type Result = usize; }

/// 传输管理器 Actor
///
/// 持有跟踪器、传输历史存储和保存位置选择器；引擎回调一律按句柄
/// 查表分发，不捕获闭包状态。任何协议违规都退化为日志，绝不向上抛。
pub struct TransferManagerActor {
    tracker: TransferTracker,
    history: HistoryStore<TransferRecord>,
    status: Addr<StatusAggregatorActor>,
    prompt: Box<dyn SavePrompt>,
    clear_delay: Duration,
}

impl TransferManagerActor {
    pub fn new(
        history: HistoryStore<TransferRecord>,
        status: Addr<StatusAggregatorActor>,
        prompt: Box<dyn SavePrompt>,
        clear_delay: Duration,
    ) -> Self {
        Self {
            tracker: TransferTracker::new(),
            history,
            status,
            prompt,
            clear_delay,
        }
    }
}

impl Actor for TransferManagerActor {
    type Context = Context<Self>;
}

impl Handler<DownloadRequested> for TransferManagerActor {
    type Result = ();
    fn handle(&mut self, msg: DownloadRequested, _ctx: &mut Self::Context) {
        let source_url = msg.delegate.source_url();
        let suggested = if !msg.suggested_name.is_empty() {
            msg.suggested_name.clone()
        } else {
            file_name_from_url(&source_url).unwrap_or_default()
        };

        let save_path = match self.prompt.choose_save_path(&suggested) {
            Some(path) => path,
            None => {
                // 用户取消：在边界处终止，不留任何状态
                info!("用户取消下载: {}", source_url);
                msg.delegate.cancel();
                return;
            }
        };

        msg.delegate.set_destination(&save_path);
        msg.delegate.accept();

        let dest = save_path.to_string_lossy().to_string();
        if let Err(e) = self.tracker.accept(msg.handle, &dest, &source_url) {
            // 引擎违反句柄唯一性约定，忽略本次登记防止覆盖在途状态
            error!("登记传输失败: {}", e);
            return;
        }

        info!("开始下载: {} -> {}", source_url, dest);
        self.status.do_send(SetTransferProgress(format!(
            "Downloading: {}",
            file_name_of(&dest)
        )));
    }
}

impl Handler<DownloadProgress> for TransferManagerActor {
    type Result = ();
    fn handle(&mut self, msg: DownloadProgress, _ctx: &mut Self::Context) {
        let snapshot = self.tracker.on_progress(msg.handle, msg.bytes_received, msg.bytes_total);
        if snapshot.file_name.is_empty() {
            // 未知句柄：tracker 已记日志，不发布任何状态
            return;
        }
        self.status.do_send(SetTransferProgress(format!(
            "Downloading: {} - {}% - {:.2} KB/s",
            snapshot.file_name, snapshot.percent, snapshot.speed_kbps
        )));
    }
}

impl Handler<DownloadFinished> for TransferManagerActor {
    type Result = ();
    fn handle(&mut self, msg: DownloadFinished, _ctx: &mut Self::Context) {
        let record = match self.tracker.on_finished(msg.handle) {
            Some(record) => record,
            None => {
                warn!("收到未登记句柄的完成回调: {:?}", msg.handle);
                return;
            }
        };

        info!("下载完成: {}", record.path);
        self.status.do_send(SetTransferProgress(format!(
            "Download completed: {}",
            record.file_name
        )));
        self.status.do_send(ClearTransferProgressAfter(self.clear_delay));

        // 持久化失败只表现为历史缺失，不影响传输本身
        if let Err(e) = self.history.append(record) {
            error!("写入下载历史失败: {}", e);
        }
    }
}

impl Handler<QueryStatusText> for TransferManagerActor {
    type Result = ResponseFuture<String>;
    fn handle(&mut self, _msg: QueryStatusText, _ctx: &mut Self::Context) -> Self::Result {
        let fut = self.status.send(QueryStatusLine).map(|res| res.unwrap_or_default());
        Box::pin(fut)
    }
}

impl Handler<QueryActiveTransfers> for TransferManagerActor {
    type Result = usize;
    fn handle(&mut self, _msg: QueryActiveTransfers, _ctx: &mut Self::Context) -> usize {
        self.tracker.active_count()
    }
}
