//! 外部调试事件适配器
//!
//! 把爬虫类框架的调试钩子事件（request / response / scraped）
//! 转换为一次 `debug` 调用。未识别的事件类型统一归为 [`EventKind::Unknown`]。

use crate::core::event::Attr;
use crate::core::logger::Log;
use crate::error::Result;
use std::collections::BTreeMap;
use std::fmt;

/// 调试事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Request,
    Response,
    Scraped,
    Unknown,
}

impl EventKind {
    /// 从事件类型字符串解析，大小写不敏感
    pub fn parse(kind: &str) -> Self {
        match kind.trim().to_lowercase().as_str() {
            "request" => EventKind::Request,
            "response" => EventKind::Response,
            "scraped" => EventKind::Scraped,
            _ => EventKind::Unknown,
        }
    }

    /// 写入日志时使用的消息
    pub fn message(&self) -> &'static str {
        match self {
            EventKind::Request => "request",
            EventKind::Response => "response",
            EventKind::Scraped => "scraped",
            EventKind::Unknown => "unknown event",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// 外部调试事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugEvent {
    /// 原始类型字符串
    pub kind: String,
    pub request_id: u32,
    pub collector_id: u32,
    pub values: BTreeMap<String, String>,
}

impl DebugEvent {
    pub fn new<S: Into<String>>(kind: S, request_id: u32, collector_id: u32) -> Self {
        Self {
            kind: kind.into(),
            request_id,
            collector_id,
            values: BTreeMap::new(),
        }
    }

    /// 添加载荷字段
    pub fn with_value<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn event_kind(&self) -> EventKind {
        EventKind::parse(&self.kind)
    }
}

/// 调试钩子接口
pub trait Debugger: Send + Sync {
    /// 初始化钩子
    fn init(&self) -> Result<()>;

    /// 接收一个调试事件
    fn event(&self, event: &DebugEvent);
}

/// 把调试事件转发到任意 [`Log`] 实现
#[derive(Debug, Clone)]
pub struct DebugBridge<L: Log> {
    logger: L,
}

impl<L: Log> DebugBridge<L> {
    pub fn new(logger: L) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }
}

impl<L: Log> Debugger for DebugBridge<L> {
    fn init(&self) -> Result<()> {
        self.logger.debug("debugger initialized", Vec::new());
        Ok(())
    }

    fn event(&self, event: &DebugEvent) {
        let mut attrs = Vec::with_capacity(event.values.len() + 3);
        attrs.push(Attr::new("kind", event.kind.as_str()));
        attrs.push(Attr::new("requestID", event.request_id));
        attrs.push(Attr::new("collectorID", event.collector_id));
        attrs.extend(
            event
                .values
                .iter()
                .map(|(k, v)| Attr::new(k.as_str(), v.as_str())),
        );

        self.logger.debug(event.event_kind().message(), attrs);
    }
}
