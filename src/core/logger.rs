//! Logger 核心
//!
//! [`Logger`] 是面向调用方的句柄：构建事件，注入作用域与静态上下文，
//! 然后交给共享的 [`Dispatcher`]。句柄构建后不可变，`with_operation`
//! 返回新的句柄，父句柄保持不变，因此并发使用无需加锁。
//!
//! # 使用示例
//!
//! ```rust,no_run
//! use loggo::{attrs, new_logger, new_operation_id, Level};
//!
//! let logger = new_logger("/var/log/app/app.log", Level::Info)?;
//! let op = logger.with_operation(new_operation_id());
//! op.info("fetching page", attrs!["url" => "https://example.com"]);
//! # Ok::<(), loggo::LoggoError>(())
//! ```

use crate::config::{validate_config, LoggerConfig};
use crate::core::dispatcher::Dispatcher;
use crate::core::event::{Attr, ErrorDetail, LogEvent};
use crate::core::level::Level;
use crate::core::terminate::{ProcessExit, Terminate, FATAL_EXIT_CODE};
use crate::diagnostics::DiagnosticsSnapshot;
use crate::error::Result;
use crate::sinks::console::ConsoleSink;
use crate::sinks::file::FileSink;
use crate::sinks::traits::LogSink;
use crate::utils::background_info::BackgroundInfo;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

/// 日志能力
///
/// 对象安全，[`Logger`] 与 [`crate::testing::RecordingLogger`] 都实现了它，
/// 依赖日志的组件应持有 `Arc<dyn Log>` 或泛型 `L: Log`。
pub trait Log: Send + Sync {
    fn debug(&self, msg: &str, attrs: Vec<Attr>);
    fn info(&self, msg: &str, attrs: Vec<Attr>);
    fn warn(&self, msg: &str, attrs: Vec<Attr>);
    fn error(&self, msg: &str, err: Option<&dyn Error>, attrs: Vec<Attr>);
    /// 以 Error 级别记录，全部写入完成后终止进程
    fn fatal(&self, msg: &str, err: Option<&dyn Error>, attrs: Vec<Attr>);
    /// 派生作用域为 `operation_id` 的子 logger，空字符串表示无作用域
    fn with_operation(&self, operation_id: &str) -> Box<dyn Log>;
    fn is_debug_enabled(&self) -> bool;
}

/// 生成新的操作 ID（随机 UUID v4）
pub fn new_operation_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 以持久化目标路径和级别创建 logger
///
/// `level` 同时是持久化 sink 的阈值和 logger 自身的级别；
/// 控制台 sink 使用默认配置（stdout，Info）。
pub fn new_logger<P: AsRef<Path>>(path: P, level: Level) -> Result<Logger> {
    let mut config = LoggerConfig::new(path.as_ref());
    config.level = level;
    config.file.level = Some(level);
    Logger::from_config(config)
}

/// Logger 句柄
#[derive(Debug, Clone)]
pub struct Logger {
    dispatcher: Arc<Dispatcher>,
    terminator: Arc<dyn Terminate>,
    context: Arc<[Attr]>,
    level: Level,
    operation_id: Option<String>,
}

impl Logger {
    /// 创建构建器
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// 根据配置创建 logger
    ///
    /// 持久化目标无法打开时返回错误。
    pub fn from_config(config: LoggerConfig) -> Result<Self> {
        validate_config(&config)?;

        let file_sink = FileSink::from_config(&config.file)?;
        let mut builder = Logger::builder()
            .level(config.level)
            .sink(Arc::new(file_sink));

        if config.console.enabled {
            builder = builder.sink(Arc::new(ConsoleSink::from_config(&config.console)));
        }

        if config.include_pid || config.include_hostname {
            let info = BackgroundInfo::new();
            if config.include_pid {
                builder = builder.context_field("pid", info.pid);
            }
            if config.include_hostname {
                builder = builder.context_field("hostname", info.hostname);
            }
        }

        for (key, value) in config.context_fields {
            builder = builder.context_field(key, value);
        }

        Ok(builder.build())
    }

    pub fn debug(&self, msg: &str, attrs: Vec<Attr>) {
        self.emit(self.event(Level::Debug, msg, attrs));
    }

    pub fn info(&self, msg: &str, attrs: Vec<Attr>) {
        self.emit(self.event(Level::Info, msg, attrs));
    }

    pub fn warn(&self, msg: &str, attrs: Vec<Attr>) {
        self.emit(self.event(Level::Warn, msg, attrs));
    }

    /// 记录错误；`err` 为 `None` 时 `error` 字段仍然存在且为空
    pub fn error(&self, msg: &str, err: Option<&dyn Error>, attrs: Vec<Attr>) {
        let event = self
            .event(Level::Error, msg, attrs)
            .with_error(ErrorDetail::from_error(err));
        self.emit(event);
    }

    /// 与 [`Logger::error`] 相同，分发并刷新所有 sink 后以退出码 1 终止
    pub fn fatal(&self, msg: &str, err: Option<&dyn Error>, attrs: Vec<Attr>) {
        let event = self
            .event(Level::Error, msg, attrs)
            .with_error(ErrorDetail::from_error(err));
        self.dispatcher.dispatch(&event);
        self.dispatcher.flush();
        self.terminator.terminate(FATAL_EXIT_CODE);
    }

    /// 派生共享同一分发器的子 logger，不修改自身
    pub fn with_operation<S: Into<String>>(&self, operation_id: S) -> Logger {
        let operation_id = operation_id.into();
        Logger {
            operation_id: (!operation_id.is_empty()).then_some(operation_id),
            ..self.clone()
        }
    }

    /// logger 自身级别是否为 Debug
    ///
    /// 仅供调用方跳过昂贵的属性计算，与各 sink 的阈值无关。
    pub fn is_debug_enabled(&self) -> bool {
        self.level <= Level::Debug
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// 分发器的诊断快照，所有派生 logger 共享
    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.dispatcher.diagnostics()
    }

    /// 刷新所有 sink
    pub fn flush(&self) {
        self.dispatcher.flush();
    }

    fn event(&self, level: Level, msg: &str, attrs: Vec<Attr>) -> LogEvent {
        let mut event = LogEvent::new(level, msg)
            .with_attributes(self.context.iter().cloned())
            .with_attributes(attrs);
        event.operation_id = self.operation_id.clone();
        event
    }

    fn emit(&self, event: LogEvent) {
        self.dispatcher.dispatch(&event);
    }
}

impl Log for Logger {
    fn debug(&self, msg: &str, attrs: Vec<Attr>) {
        Logger::debug(self, msg, attrs)
    }

    fn info(&self, msg: &str, attrs: Vec<Attr>) {
        Logger::info(self, msg, attrs)
    }

    fn warn(&self, msg: &str, attrs: Vec<Attr>) {
        Logger::warn(self, msg, attrs)
    }

    fn error(&self, msg: &str, err: Option<&dyn Error>, attrs: Vec<Attr>) {
        Logger::error(self, msg, err, attrs)
    }

    fn fatal(&self, msg: &str, err: Option<&dyn Error>, attrs: Vec<Attr>) {
        Logger::fatal(self, msg, err, attrs)
    }

    fn with_operation(&self, operation_id: &str) -> Box<dyn Log> {
        Box::new(Logger::with_operation(self, operation_id))
    }

    fn is_debug_enabled(&self) -> bool {
        Logger::is_debug_enabled(self)
    }
}

/// Logger 构建器
#[derive(Debug)]
pub struct LoggerBuilder {
    level: Level,
    sinks: Vec<Arc<dyn LogSink>>,
    context: Vec<Attr>,
    terminator: Option<Arc<dyn Terminate>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            level: Level::default(),
            sinks: Vec::new(),
            context: Vec::new(),
            terminator: None,
        }
    }

    /// 设置 logger 自身级别
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// 追加 sink，分发顺序与追加顺序一致
    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// 添加附加到每个事件上的静态字段
    pub fn context_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        self.context.push(Attr::new(key, value));
        self
    }

    /// 替换终止能力，默认为 [`ProcessExit`]
    pub fn terminator(mut self, terminator: Arc<dyn Terminate>) -> Self {
        self.terminator = Some(terminator);
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            dispatcher: Arc::new(Dispatcher::new(self.sinks)),
            terminator: self
                .terminator
                .unwrap_or_else(|| Arc::new(ProcessExit)),
            context: self.context.into(),
            level: self.level,
            operation_id: None,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
