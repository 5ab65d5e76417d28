use actix::prelude::*;
use crossterm::{cursor, execute, terminal};
use log::LevelFilter;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tailsdown::cli;
use tailsdown::config::Config;
use tailsdown::core::engine::{EngineDownload, FixedDirPrompt, TransferHandle};
use tailsdown::core::history::{HistoryStore, NavigationRecord, TransferRecord};
use tailsdown::core::manager::{
    DownloadFinished, DownloadProgress, DownloadRequested, TransferManagerActor,
};
use tailsdown::core::navigation::{LoadFinished, LoadProgress, LoadStarted, NavigationActor};
use tailsdown::core::status::{PublishStatus, StatusAggregatorActor};
use tailsdown::ui;
use tailsdown::utils::logger::{LoggerActor, LoggerExt};

/// 模拟传输的总字节数与单次进度步长
const SIMULATED_TOTAL: u64 = 4 * 1024 * 1024;
const SIMULATED_STEP: u64 = 512 * 1024;
const SIMULATED_TICK: Duration = Duration::from_millis(200);

#[actix::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let (args, config) = match cli::Args::parse_args() {
        Ok((args, config)) => (args, config),
        Err(e) => {
            eprintln!("参数解析失败: {}", e);
            std::process::exit(1);
        }
    };

    let logger = LoggerActor::new(&config.log_file, LevelFilter::Info)?.start();
    logger.info("程序启动");

    if args.downloads {
        list_downloads(&config);
    } else if args.visits {
        list_visits(&config);
    } else if args.simulate {
        run_simulation(&config, &logger).await?;
    } else {
        ui::print_error("未指定操作，使用 --downloads / --visits / --simulate，--help 查看用法");
    }

    Ok(())
}

/// 打印下载历史（历史浏览对话框的终端版）
fn list_downloads(config: &Config) {
    let store: HistoryStore<TransferRecord> = HistoryStore::new(&config.download_history_file);
    let records = store.load_all();
    if records.is_empty() {
        ui::print_error(&format!("没有下载记录 ({})", config.download_history_file));
        return;
    }
    for record in &records {
        println!("{}", ui::transfer_line(record));
    }
    ui::print_success(&format!("共 {} 条下载记录", records.len()));
}

/// 打印浏览历史
fn list_visits(config: &Config) {
    let store: HistoryStore<NavigationRecord> = HistoryStore::new(&config.history_file);
    let records = store.load_all();
    if records.is_empty() {
        ui::print_error(&format!("没有浏览记录 ({})", config.history_file));
        return;
    }
    for record in &records {
        println!("{}", ui::navigation_line(record));
    }
    ui::print_success(&format!("共 {} 条浏览记录", records.len()));
}

/// 把状态行渲染到终端当前行的 UI sink
struct TerminalStatusSink;
impl Actor for TerminalStatusSink {
    type Context = Context<Self>;
}
impl Handler<PublishStatus> for TerminalStatusSink {
    type Result = ();
    fn handle(&mut self, msg: PublishStatus, _ctx: &mut Self::Context) {
        let mut out = std::io::stdout();
        let _ = execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(terminal::ClearType::CurrentLine)
        );
        print!("{}", msg.text);
        let _ = out.flush();
    }
}

/// 模拟引擎下载项：不做真实 IO，只响应 core 的回调
struct SimulatedDownload {
    url: String,
}
impl EngineDownload for SimulatedDownload {
    fn source_url(&self) -> String {
        self.url.clone()
    }
    fn set_destination(&self, path: &Path) {
        log::info!("模拟引擎: 保存到 {}", path.display());
    }
    fn accept(&self) {
        log::info!("模拟引擎: 接受下载");
    }
    fn cancel(&self) {
        log::info!("模拟引擎: 取消下载");
    }
}

/// 用脚本化的引擎事件序列演示状态栏：页面加载 -> 下载 -> 安静期清除
async fn run_simulation(config: &Config, logger: &Addr<LoggerActor>) -> anyhow::Result<()> {
    println!("模拟传输开始，状态栏输出如下：");
    logger.info("开始状态栏演示");

    let sink = TerminalStatusSink.start();
    let status = StatusAggregatorActor::new(sink.recipient()).start();
    let manager = TransferManagerActor::new(
        HistoryStore::new(&config.download_history_file),
        status.clone(),
        Box::new(FixedDirPrompt { dir: PathBuf::from(&config.download_dir) }),
        Duration::from_secs(config.status_clear_secs),
    )
    .start();
    let navigation =
        NavigationActor::new(HistoryStore::new(&config.history_file), status.clone()).start();

    // 页面加载事件
    navigation.send(LoadStarted).await?;
    tokio::time::sleep(Duration::from_millis(400)).await;
    for progress in [25u32, 60, 100] {
        navigation.send(LoadProgress(progress)).await?;
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    navigation
        .send(LoadFinished { url: "https://example.com/files/".to_string() })
        .await?;

    // 一次完整的下载生命周期
    let handle = TransferHandle(1);
    manager
        .send(DownloadRequested {
            handle,
            suggested_name: "sample.bin".to_string(),
            delegate: Box::new(SimulatedDownload {
                url: "https://example.com/files/sample.bin".to_string(),
            }),
        })
        .await?;

    let mut received = 0u64;
    while received < SIMULATED_TOTAL {
        received = (received + SIMULATED_STEP).min(SIMULATED_TOTAL);
        manager
            .send(DownloadProgress {
                handle,
                bytes_received: received,
                bytes_total: SIMULATED_TOTAL,
            })
            .await?;
        tokio::time::sleep(SIMULATED_TICK).await;
    }
    manager.send(DownloadFinished { handle }).await?;

    // 等安静期清除落地再退出
    tokio::time::sleep(Duration::from_secs(config.status_clear_secs) + Duration::from_millis(300))
        .await;
    println!();
    ui::print_success(&format!("演示结束，下载记录已写入 {}", config.download_history_file));
    logger.info("状态栏演示结束");
    Ok(())
}
