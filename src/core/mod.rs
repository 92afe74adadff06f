//! loggo 核心模块
//!
//! 本模块包含级别、事件、格式化、分发器与 Logger。

pub mod dispatcher;
pub mod event;
pub mod format;
pub mod level;
pub mod logger;
pub mod terminate;

// 重新导出核心类型
pub use dispatcher::Dispatcher;
pub use event::{Attr, ErrorDetail, LogEvent};
pub use level::Level;
pub use logger::{new_logger, new_operation_id, Log, Logger, LoggerBuilder};
pub use terminate::{ProcessExit, Terminate, FATAL_EXIT_CODE};
