//! loggo Sink Traits
//!
//! 定义了统一的 Sink trait 接口，允许开发者实现自定义的日志输出目标。
//!
//! 每个 sink 拥有自己的最低级别阈值和写入目标，彼此之间不共享可变状态。
//! 写入失败通过返回值报告，绝不以 panic 的形式传播给调用方。
//!
//! # 使用示例
//!
//! ```rust
//! use loggo::sinks::traits::{LogSink, SinkResult};
//! use loggo::{Level, LogEvent};
//!
//! #[derive(Debug)]
//! struct PrintSink;
//!
//! impl LogSink for PrintSink {
//!     fn name(&self) -> &'static str {
//!         "print"
//!     }
//!
//!     fn threshold(&self) -> Level {
//!         Level::Warn
//!     }
//!
//!     fn write(&self, event: &LogEvent) -> SinkResult<()> {
//!         println!("{} {}", event.level, event.message);
//!         Ok(())
//!     }
//! }
//! ```

use crate::core::event::LogEvent;
use crate::core::level::Level;
use std::fmt::Debug;

/// 基础 Sink trait
///
/// 所有日志输出目标都必须实现此 trait。实现必须是 `Send + Sync`，
/// 并发写入同一目标时由实现自身负责串行化。
pub trait LogSink: Send + Sync + Debug {
    /// 获取 sink 的名称，用于失败报告
    fn name(&self) -> &'static str;

    /// 此 sink 记录的最低级别
    fn threshold(&self) -> Level;

    /// 编码并写入一个事件
    ///
    /// 不得无限期阻塞，不得重试。
    fn write(&self, event: &LogEvent) -> SinkResult<()>;

    /// 刷新尚未落盘的数据
    fn flush(&self) -> SinkResult<()> {
        Ok(())
    }

    /// 此 sink 是否接收给定级别的事件
    fn admits(&self, level: Level) -> bool {
        level.admitted_by(self.threshold())
    }
}

/// 通用 Sink 错误类型
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// I/O 错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 写入过程中发生 panic
    #[error("Sink panicked: {0}")]
    Panicked(String),

    /// 通用错误
    #[error("Generic error: {0}")]
    Generic(String),
}

/// Sink 结果类型
pub type SinkResult<T> = Result<T, SinkError>;
