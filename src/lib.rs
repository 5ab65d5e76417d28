//! Tailsdown: Tails 浏览器的下载生命周期与状态栏管理器
//!
//! 浏览器外壳把渲染、导航和 TLS 都交给内嵌引擎，这个 crate 只负责
//! 引擎下载事件的跟踪（进度、瞬时速度）、状态栏片段的聚合发布，
//! 以及下载/浏览历史的持久化与展示。

pub mod cli;
pub mod config;
pub mod core;
pub mod ui;
pub mod utils;
