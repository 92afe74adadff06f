//! loggo - 分级多 sink 结构化日志核心
//!
//! loggo 接收应用代码发出的分级日志事件，附加作用域与上下文，
//! 然后扇出到多个各自带阈值的 sink：一个持久化的 JSON 行文件，
//! 一个面向人阅读的控制台输出。
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use loggo::{attrs, new_logger, new_operation_id, Level};
//!
//! fn main() -> loggo::Result<()> {
//!     let logger = new_logger("/var/log/app/app.log", Level::Debug)?;
//!
//!     logger.info("Application started", attrs!["version" => "1.0.0"]);
//!
//!     let op = logger.with_operation(new_operation_id());
//!     op.debug("fetching", attrs!["url" => "https://example.com"]);
//!
//!     let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
//!     op.error("fetch failed", Some(&err), attrs![]);
//!     Ok(())
//! }
//! ```
//!
//! # 自定义配置
//!
//! ```rust,no_run
//! use loggo::{LoggerConfig, Logger, Level};
//!
//! let mut config = LoggerConfig::new("/var/log/app/app.log");
//! config.level = Level::Debug;
//! config.console.level = Level::Warn;
//! config.include_hostname = true;
//!
//! let logger = Logger::from_config(config)?;
//! assert!(logger.is_debug_enabled());
//! # Ok::<(), loggo::LoggoError>(())
//! ```

pub mod bridge;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod env_config;
pub mod error;
pub mod sinks;
pub mod testing;
pub mod utils;

// 重新导出主要类型
pub use config::{
    load_config_from_file, load_config_from_str, validate_config, ConsoleSinkConfig,
    ConsoleTarget, FileSinkConfig, LoggerConfig,
};
pub use diagnostics::DiagnosticsSnapshot;
pub use env_config::EnvConfig;
pub use error::{LoggoError, Result};

// 重新导出核心功能
pub use core::dispatcher::Dispatcher;
pub use core::event::{Attr, ErrorDetail, LogEvent};
pub use core::level::Level;
pub use core::logger::{new_logger, new_operation_id, Log, Logger, LoggerBuilder};
pub use core::terminate::{ProcessExit, Terminate, FATAL_EXIT_CODE};
pub use sinks::{ConsoleSink, FileSink, LogSink, SinkError, SinkResult};
pub use testing::RecordingLogger;

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 从 TOML 配置文件创建 logger
///
/// 加载文件，用 `LOGGO_*` 环境变量覆盖，再构建 logger。
///
/// # 示例
///
/// ```rust,no_run
/// let logger = loggo::new_logger_from_file("loggo.toml")?;
/// logger.info("configured from file", vec![]);
/// # Ok::<(), loggo::LoggoError>(())
/// ```
pub fn new_logger_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Logger> {
    let mut config = load_config_from_file(path.as_ref())?;
    EnvConfig::apply(&mut config)?;
    Logger::from_config(config)
}
