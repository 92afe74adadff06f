//! 外部事件生产者适配器
//!
//! 把其他系统的事件形状翻译成 [`crate::Log`] 调用，核心不依赖这里的任何类型。

pub mod debugger;
pub mod tracing_layer;

pub use debugger::{DebugBridge, DebugEvent, Debugger, EventKind};
pub use tracing_layer::TracingBridge;
