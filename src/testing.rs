//! 测试替身
//!
//! - [`RecordingLogger`]：实现 [`Log`]，按调用顺序记录每条消息，不写任何 sink
//! - [`RecordingTerminator`]：记录 `fatal` 的终止请求而不结束进程
//! - [`MemorySink`]：共享的内存写入目标，可交给 `FileSink`/`ConsoleSink`
//!
//! ```rust
//! use loggo::testing::RecordingLogger;
//! use loggo::Log;
//!
//! let logger = RecordingLogger::new();
//! let scoped = logger.with_operation("op-1");
//! scoped.info("fetched", vec![]);
//!
//! assert_eq!(logger.infos(), vec!["fetched"]);
//! assert_eq!(logger.entries()[0].operation_id.as_deref(), Some("op-1"));
//! ```

use crate::core::event::{Attr, ErrorDetail};
use crate::core::format::{decode_json_line, DecodedRecord};
use crate::core::level::Level;
use crate::core::logger::Log;
use crate::core::terminate::Terminate;
use std::error::Error;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 一条被记录的调用
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEntry {
    /// Fatal 以 Error 记录，并设置 `fatal`
    pub level: Level,
    pub fatal: bool,
    pub message: String,
    /// 仅 Error/Fatal 调用携带
    pub error: Option<ErrorDetail>,
    pub operation_id: Option<String>,
    pub attrs: Vec<Attr>,
}

/// 记录型 logger
///
/// 派生出的作用域 logger 与父 logger 共享同一份记录。
#[derive(Debug, Clone)]
pub struct RecordingLogger {
    entries: Arc<Mutex<Vec<RecordedEntry>>>,
    operation_id: Option<String>,
    debug_enabled: bool,
}

impl RecordingLogger {
    /// 创建新的记录型 logger，`is_debug_enabled` 默认为 true
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            operation_id: None,
            debug_enabled: true,
        }
    }

    pub fn with_debug_enabled(mut self, enabled: bool) -> Self {
        self.debug_enabled = enabled;
        self
    }

    /// 派生作用域 logger
    pub fn with_operation<S: Into<String>>(&self, operation_id: S) -> RecordingLogger {
        let operation_id = operation_id.into();
        RecordingLogger {
            operation_id: (!operation_id.is_empty()).then_some(operation_id),
            ..self.clone()
        }
    }

    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// 全部记录，按调用顺序
    pub fn entries(&self) -> Vec<RecordedEntry> {
        lock(&self.entries).clone()
    }

    /// 全部消息，按调用顺序
    pub fn messages(&self) -> Vec<String> {
        lock(&self.entries)
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn debugs(&self) -> Vec<String> {
        self.messages_where(|e| e.level == Level::Debug)
    }

    pub fn infos(&self) -> Vec<String> {
        self.messages_where(|e| e.level == Level::Info)
    }

    pub fn warns(&self) -> Vec<String> {
        self.messages_where(|e| e.level == Level::Warn)
    }

    /// Error 调用的消息，不含 Fatal
    pub fn errors(&self) -> Vec<String> {
        self.messages_where(|e| e.level == Level::Error && !e.fatal)
    }

    pub fn fatals(&self) -> Vec<String> {
        self.messages_where(|e| e.fatal)
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }

    fn messages_where<F>(&self, predicate: F) -> Vec<String>
    where
        F: Fn(&RecordedEntry) -> bool,
    {
        lock(&self.entries)
            .iter()
            .filter(|e| predicate(e))
            .map(|e| e.message.clone())
            .collect()
    }

    fn record(
        &self,
        level: Level,
        fatal: bool,
        msg: &str,
        error: Option<ErrorDetail>,
        attrs: Vec<Attr>,
    ) {
        lock(&self.entries).push(RecordedEntry {
            level,
            fatal,
            message: msg.to_string(),
            error,
            operation_id: self.operation_id.clone(),
            attrs,
        });
    }
}

impl Default for RecordingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for RecordingLogger {
    fn debug(&self, msg: &str, attrs: Vec<Attr>) {
        self.record(Level::Debug, false, msg, None, attrs);
    }

    fn info(&self, msg: &str, attrs: Vec<Attr>) {
        self.record(Level::Info, false, msg, None, attrs);
    }

    fn warn(&self, msg: &str, attrs: Vec<Attr>) {
        self.record(Level::Warn, false, msg, None, attrs);
    }

    fn error(&self, msg: &str, err: Option<&dyn Error>, attrs: Vec<Attr>) {
        let error = Some(ErrorDetail::from_error(err));
        self.record(Level::Error, false, msg, error, attrs);
    }

    fn fatal(&self, msg: &str, err: Option<&dyn Error>, attrs: Vec<Attr>) {
        let error = Some(ErrorDetail::from_error(err));
        self.record(Level::Error, true, msg, error, attrs);
    }

    fn with_operation(&self, operation_id: &str) -> Box<dyn Log> {
        Box::new(RecordingLogger::with_operation(self, operation_id))
    }

    fn is_debug_enabled(&self) -> bool {
        self.debug_enabled
    }
}

/// 记录终止请求
#[derive(Debug, Default)]
pub struct RecordingTerminator {
    calls: AtomicUsize,
    codes: Mutex<Vec<i32>>,
}

impl RecordingTerminator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 被调用的次数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 每次调用的退出码
    pub fn codes(&self) -> Vec<i32> {
        lock(&self.codes).clone()
    }
}

impl Terminate for RecordingTerminator {
    fn terminate(&self, code: i32) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.codes).push(code);
    }
}

/// 共享的内存写入目标
///
/// 克隆体共享同一缓冲区，测试保留一份用于断言。
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已写入的内容
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock(&self.buffer)).into_owned()
    }

    /// 按行拆分的内容
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// 把每行当作持久化记录解码，无法解码的行被跳过
    pub fn records(&self) -> Vec<DecodedRecord> {
        self.lines()
            .iter()
            .filter_map(|line| decode_json_line(line).ok())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.buffer).is_empty()
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.buffer).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
