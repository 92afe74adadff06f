//! loggo 基本用法示例
//!
//! 本示例展示：
//! - 用配置构建 logger（持久化文件 + 控制台）
//! - 按操作派生作用域 logger
//! - 自定义 sink 实现
//! - 把 `tracing` 事件桥接到 logger

use loggo::bridge::TracingBridge;
use loggo::{
    attrs, new_operation_id, ConsoleTarget, Level, Log, LogEvent, LogSink, Logger, LoggerConfig,
    SinkResult,
};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;

/// 只把 Warn 及以上的消息打印到 stderr 的自定义 sink
#[derive(Debug)]
struct AlertSink;

impl LogSink for AlertSink {
    fn name(&self) -> &'static str {
        "alert"
    }

    fn threshold(&self) -> Level {
        Level::Warn
    }

    fn write(&self, event: &LogEvent) -> SinkResult<()> {
        eprintln!("!! ALERT {} {}", event.level, event.message);
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_path = std::env::temp_dir().join("loggo-demo").join("app.log");

    // 1. 配置驱动
    let mut config = LoggerConfig::new(&log_path);
    config.level = Level::Debug;
    config.console.target = ConsoleTarget::Stdout;
    config.console.colored = true;
    config.include_hostname = true;
    config
        .context_fields
        .insert("service".to_string(), "demo".into());

    let logger = Logger::from_config(config)?;
    logger.info("Application started", attrs!["version" => loggo::VERSION]);
    logger.debug("only in the durable file", attrs![]);

    // 2. 作用域
    let op = logger.with_operation(new_operation_id());
    if op.is_debug_enabled() {
        op.debug("expensive details", attrs!["items" => 42]);
    }
    let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timeout");
    op.error("request failed", Some(&err), attrs!["attempt" => 3]);

    // 3. 自定义 sink
    let custom = Logger::builder()
        .level(Level::Info)
        .sink(Arc::new(AlertSink))
        .build();
    custom.info("not shown", attrs![]);
    custom.warn("disk almost full", attrs!["free_mb" => 120]);

    // 4. tracing 桥接
    let shared: Arc<dyn Log> = Arc::new(logger.clone());
    let subscriber = tracing_subscriber::registry().with(TracingBridge::new(shared));
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(target: "third_party", rows = 12u64, "query finished");
    });

    let diagnostics = logger.diagnostics();
    println!(
        "dispatched={} writes={} failures={} log_file={}",
        diagnostics.events_dispatched,
        diagnostics.sink_writes,
        diagnostics.sink_write_failures,
        log_path.display()
    );

    Ok(())
}
