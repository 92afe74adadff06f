//! 定义 loggo 分发器的内部诊断与指标。
//!
//! 每个分发器拥有自己的计数器，不存在进程级全局状态。

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 内部诊断与指标数据结构。
///
/// 使用原子操作确保线程安全，分发路径上不加锁。
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// 创建时间
    start_time: Option<Instant>,

    /// 已分发的日志事件总数
    events_dispatched: AtomicU64,

    /// 成功的 sink 写入次数
    sink_writes: AtomicU64,

    /// 失败的 sink 写入次数（包括 panic）
    sink_write_failures: AtomicU64,

    /// 因阈值被某个 sink 跳过的次数
    events_filtered: AtomicU64,
}

/// 诊断数据的快照，用于外部查询。
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsSnapshot {
    /// 运行时间
    pub uptime: Option<Duration>,

    /// 已分发的日志事件总数
    pub events_dispatched: u64,

    /// 成功的 sink 写入次数
    pub sink_writes: u64,

    /// 失败的 sink 写入次数
    pub sink_write_failures: u64,

    /// 因阈值被跳过的次数
    pub events_filtered: u64,

    /// sink 写入成功率（百分比）
    pub success_rate_percent: f64,
}

impl Diagnostics {
    /// 创建新的诊断实例。
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// 增加已分发事件计数。
    pub fn increment_events_dispatched(&self) {
        self.events_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// 增加成功写入计数。
    pub fn increment_sink_writes(&self) {
        self.sink_writes.fetch_add(1, Ordering::Relaxed);
    }

    /// 增加失败写入计数。
    pub fn increment_sink_write_failures(&self) {
        self.sink_write_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// 增加被阈值过滤的计数。
    pub fn increment_events_filtered(&self) {
        self.events_filtered.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取诊断数据的快照。
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        let sink_writes = self.sink_writes.load(Ordering::Relaxed);
        let sink_write_failures = self.sink_write_failures.load(Ordering::Relaxed);
        let attempts = sink_writes + sink_write_failures;

        let success_rate_percent = if attempts > 0 {
            (sink_writes as f64 / attempts as f64) * 100.0
        } else {
            100.0
        };

        DiagnosticsSnapshot {
            uptime: self.start_time.map(|start| start.elapsed()),
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            sink_writes,
            sink_write_failures,
            events_filtered: self.events_filtered.load(Ordering::Relaxed),
            success_rate_percent,
        }
    }
}
