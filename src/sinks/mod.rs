//! loggo Sinks 模块
//!
//! 提供日志输出目标的实现：
//!
//! - [`FileSink`]：持久化，每行一个 JSON 对象，默认记录全部级别
//! - [`ConsoleSink`]：单行 `key=value` 文本，默认 Info 及以上
//!
//! 自定义目标实现 [`LogSink`] 后即可交给 [`crate::LoggerBuilder::sink`]。

pub mod console;
pub mod file;
pub mod traits;

// 重新导出主要类型
pub use console::{ConsoleSink, DEFAULT_CONSOLE_THRESHOLD};
pub use file::{FileSink, DEFAULT_FILE_THRESHOLD};
pub use traits::{LogSink, SinkError, SinkResult};
