//! 分发器
//!
//! 把每个事件交给所有阈值允许的 sink。sink 之间相互隔离：
//! 一个 sink 返回错误或 panic 不会影响其他 sink，也不会传播给调用方。
//! 失败会写到进程 stderr 并计入诊断。

use crate::core::event::LogEvent;
use crate::diagnostics::{Diagnostics, DiagnosticsSnapshot};
use crate::sinks::traits::{LogSink, SinkError, SinkResult};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// 扇出分发器
pub struct Dispatcher {
    sinks: Vec<Arc<dyn LogSink>>,
    diagnostics: Diagnostics,
}

impl Dispatcher {
    /// 以有序的 sink 列表创建分发器
    pub fn new(sinks: Vec<Arc<dyn LogSink>>) -> Self {
        Self {
            sinks,
            diagnostics: Diagnostics::new(),
        }
    }

    /// 已注册的 sink，保持构建顺序
    pub fn sinks(&self) -> &[Arc<dyn LogSink>] {
        &self.sinks
    }

    /// 分发事件
    ///
    /// 同步执行，返回时所有被接收的 sink 都已完成写入（或失败已被捕获）。
    pub fn dispatch(&self, event: &LogEvent) {
        self.diagnostics.increment_events_dispatched();

        for sink in &self.sinks {
            if !sink.admits(event.level) {
                self.diagnostics.increment_events_filtered();
                continue;
            }

            match guarded(|| sink.write(event)) {
                Ok(()) => self.diagnostics.increment_sink_writes(),
                Err(e) => {
                    self.diagnostics.increment_sink_write_failures();
                    eprintln!(
                        "[loggo] sink '{}' failed to write event: {}",
                        sink.name(),
                        e
                    );
                }
            }
        }
    }

    /// 刷新所有 sink，失败同样只报告不传播
    pub fn flush(&self) {
        for sink in &self.sinks {
            if let Err(e) = guarded(|| sink.flush()) {
                eprintln!("[loggo] sink '{}' failed to flush: {}", sink.name(), e);
            }
        }
    }

    /// 诊断快照
    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("sinks", &self.sinks)
            .finish_non_exhaustive()
    }
}

/// 执行 sink 操作并把 panic 转换为 [`SinkError::Panicked`]
fn guarded<F>(op: F) -> SinkResult<()>
where
    F: FnOnce() -> SinkResult<()>,
{
    panic::catch_unwind(AssertUnwindSafe(op))
        .unwrap_or_else(|payload| Err(SinkError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
