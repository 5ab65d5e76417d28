use actix::prelude::*;
use log::error;

use crate::core::history::{timestamp_now, HistoryStore, NavigationRecord};
use crate::core::status::{SetConnectionPhase, SetHoveredLink, StatusAggregatorActor};

// ================== 引擎导航回调对应的消息 ==================

/// 当前标签页开始加载
pub struct LoadStarted;
impl Message for LoadStarted { type Result = (); }

/// 加载进度百分比
pub struct LoadProgress(pub u32);
impl Message for LoadProgress { type Result = (); }

/// 加载结束，url 为空表示无可记录的页面
pub struct LoadFinished {
    pub url: String,
}
impl Message for LoadFinished { type Result = (); }

/// 鼠标悬停在链接上（移出时传空串）
pub struct LinkHovered(pub String);
impl Message for LinkHovered { type Result = (); }

/// 导航事件适配器
///
/// 引擎的页面加载回调绕过传输跟踪器，直接落到连接阶段片段和浏览历史。
pub struct NavigationActor {
    history: HistoryStore<NavigationRecord>,
    status: Addr<StatusAggregatorActor>,
}

impl NavigationActor {
    pub fn new(history: HistoryStore<NavigationRecord>, status: Addr<StatusAggregatorActor>) -> Self {
        Self { history, status }
    }
}

impl Actor for NavigationActor {
    type Context = Context<Self>;
}

impl Handler<LoadStarted> for NavigationActor {
    type Result = ();
    fn handle(&mut self, _msg: LoadStarted, _ctx: &mut Self::Context) {
        self.status.do_send(SetConnectionPhase(
            "Send request GET, TLS Handshake in progress...".to_string(),
        ));
    }
}

impl Handler<LoadProgress> for NavigationActor {
    type Result = ();
    fn handle(&mut self, msg: LoadProgress, _ctx: &mut Self::Context) {
        self.status.do_send(SetConnectionPhase(format!("Receiving data: {}%", msg.0)));
    }
}

impl Handler<LoadFinished> for NavigationActor {
    type Result = ();
    fn handle(&mut self, msg: LoadFinished, _ctx: &mut Self::Context) {
        self.status.do_send(SetConnectionPhase("Ready".to_string()));
        if msg.url.is_empty() {
            return;
        }
        let record = NavigationRecord {
            url: msg.url,
            timestamp: timestamp_now(),
        };
        if let Err(e) = self.history.append(record) {
            error!("写入浏览历史失败: {}", e);
        }
    }
}

impl Handler<LinkHovered> for NavigationActor {
    type Result = ();
    fn handle(&mut self, msg: LinkHovered, _ctx: &mut Self::Context) {
        self.status.do_send(SetHoveredLink(msg.0));
    }
}
