use actix::prelude::*;
use std::time::Duration;
use log::debug;

/// 片段之间的固定分隔符
const SEPARATOR: &str = " | ";

/// 发布到 UI 的最终状态行，core 不读任何 UI 状态
pub struct PublishStatus {
    pub text: String,
}
impl Message for PublishStatus { type Result = (); }

/// 设置连接阶段片段（由导航/回退探测协作方调用）
pub struct SetConnectionPhase(pub String);
impl Message for SetConnectionPhase { type Result = (); }

/// 设置悬停链接片段（鼠标移出时传空串）
pub struct SetHoveredLink(pub String);
impl Message for SetHoveredLink { type Result = (); }

/// 设置传输进度片段
pub struct SetTransferProgress(pub String);
impl Message for SetTransferProgress { type Result = (); }

/// 安静期后一次性清除传输片段
///
/// 若在定时器触发前有新的 SetTransferProgress，清除退化为空操作。
pub struct ClearTransferProgressAfter(pub Duration);
impl Message for ClearTransferProgressAfter { type Result = (); }

/// 查询当前拼接后的状态行
pub struct QueryStatusLine;
impl Message for QueryStatusLine { type Result = String; }

/// 状态聚合器
///
/// 三个具名片段的唯一写入口。所有写都走消息，拼接和发布在同一个
/// handler 内同步完成，不做合并或缓冲。
pub struct StatusAggregatorActor {
    connection_phase: String,
    hovered_link: String,
    transfer_progress: String,
    // 每次写传输片段递增；调度的清除捕获当时的值，不相等则放弃
    generation: u64,
    sink: Recipient<PublishStatus>,
}

impl StatusAggregatorActor {
    pub fn new(sink: Recipient<PublishStatus>) -> Self {
        Self {
            connection_phase: String::new(),
            hovered_link: String::new(),
            transfer_progress: String::new(),
            generation: 0,
            sink,
        }
    }

    fn publish(&self) {
        let text = join_fragments(&self.connection_phase, &self.hovered_link, &self.transfer_progress);
        debug!("状态栏更新: {:?}", text);
        let _ = self.sink.do_send(PublishStatus { text });
    }
}

/// 按固定顺序拼接非空片段，全空得到空串
pub fn join_fragments(connection: &str, hovered: &str, transfer: &str) -> String {
    let mut line = String::new();
    for fragment in [connection, hovered, transfer] {
        if fragment.is_empty() {
            continue;
        }
        if !line.is_empty() {
            line.push_str(SEPARATOR);
        }
        line.push_str(fragment);
    }
    line
}

impl Actor for StatusAggregatorActor {
    type Context = Context<Self>;
}

impl Handler<SetConnectionPhase> for StatusAggregatorActor {
    type Result = ();
    fn handle(&mut self, msg: SetConnectionPhase, _ctx: &mut Self::Context) {
        self.connection_phase = msg.0;
        self.publish();
    }
}

impl Handler<SetHoveredLink> for StatusAggregatorActor {
    type Result = ();
    fn handle(&mut self, msg: SetHoveredLink, _ctx: &mut Self::Context) {
        self.hovered_link = msg.0;
        self.publish();
    }
}

impl Handler<SetTransferProgress> for StatusAggregatorActor {
    type Result = ();
    fn handle(&mut self, msg: SetTransferProgress, _ctx: &mut Self::Context) {
        self.generation += 1;
        self.transfer_progress = msg.0;
        self.publish();
    }
}

impl Handler<ClearTransferProgressAfter> for StatusAggregatorActor {
    type Result = ();
    fn handle(&mut self, msg: ClearTransferProgressAfter, ctx: &mut Self::Context) {
        let scheduled_generation = self.generation;
        ctx.run_later(msg.0, move |act, _ctx| {
            if act.generation != scheduled_generation {
                // 期间有新的传输进度写入，本次清除作废
                return;
            }
            act.generation += 1;
            act.transfer_progress.clear();
            act.publish();
        });
    }
}

impl Handler<QueryStatusLine> for StatusAggregatorActor {
    type Result = String;
    fn handle(&mut self, _msg: QueryStatusLine, _ctx: &mut Self::Context) -> String {
        join_fragments(&self.connection_phase, &self.hovered_link, &self.transfer_progress)
    }
}
