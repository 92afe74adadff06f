//! `tracing` 桥接层
//!
//! 第三方库通过 `tracing` 发出的事件经由此层转发到任意 [`Log`] 实现，
//! `target` 与记录的字段成为属性。

use crate::core::event::Attr;
use crate::core::level::Level;
use crate::core::logger::Log;
use crate::error::{LoggoError, Result};
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// 目标字段名
const TARGET_KEY: &str = "target";

/// 把 `tracing` 事件转发到 [`Log`] 的订阅层
pub struct TracingBridge {
    logger: Arc<dyn Log>,
    min_level: Level,
}

impl TracingBridge {
    /// 转发全部级别（TRACE 视作 DEBUG）
    pub fn new(logger: Arc<dyn Log>) -> Self {
        Self {
            logger,
            min_level: Level::Debug,
        }
    }

    /// 只转发不低于 `level` 的事件
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// 安装为全局 `tracing` 订阅器
    ///
    /// 进程中已存在全局订阅器时返回 [`LoggoError::BridgeError`]。
    pub fn install_global(self) -> Result<()> {
        let subscriber = tracing_subscriber::registry().with(self);
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| LoggoError::bridge(format!("无法安装全局订阅器: {}", e)))
    }
}

impl fmt::Debug for TracingBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingBridge")
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

// 提取 message 与其余字段
struct FieldVisitor {
    message: Option<String>,
    attrs: Vec<Attr>,
}

impl FieldVisitor {
    fn record_value(&mut self, field: &Field, value: serde_json::Value) {
        self.attrs.push(Attr::new(field.name(), value));
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let value_str = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(value_str);
        } else {
            self.record_value(field, serde_json::Value::String(value_str));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.record_value(field, serde_json::Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, serde_json::Value::Bool(value));
    }
}

impl<S> Layer<S> for TracingBridge
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Level::from(*metadata.level());
        if !level.admitted_by(self.min_level) {
            return;
        }

        let mut visitor = FieldVisitor {
            message: None,
            attrs: vec![Attr::new(TARGET_KEY, metadata.target())],
        };
        event.record(&mut visitor);

        let message = visitor
            .message
            .unwrap_or_else(|| format!("event from {}", metadata.target()));

        match level {
            Level::Debug => self.logger.debug(&message, visitor.attrs),
            Level::Info => self.logger.info(&message, visitor.attrs),
            Level::Warn => self.logger.warn(&message, visitor.attrs),
            Level::Error => self.logger.error(&message, None, visitor.attrs),
        }
    }
}
