//! loggo 事件定义
//!
//! 此模块定义了日志事件、属性以及错误附件。事件一经构建即不可变，
//! 由 Logger 创建并以只读引用交给每个 sink。

use crate::core::level::Level;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 时间戳字段名
pub const TIMESTAMP_KEY: &str = "timestamp";
/// 级别字段名
pub const LEVEL_KEY: &str = "level";
/// 消息字段名
pub const MESSAGE_KEY: &str = "msg";
/// 操作作用域字段名
pub const OPERATION_ID_KEY: &str = "operationID";
/// 错误字段名
pub const ERROR_KEY: &str = "error";

/// 与固定字段冲突的属性会被加上此前缀
const SHADOWED_KEY_PREFIX: &str = "attr.";

/// 单个结构化属性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    /// 创建新的属性
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 构建属性列表
///
/// ```rust
/// use loggo::attrs;
///
/// let attrs = attrs!["user" => "alice", "attempt" => 3];
/// assert_eq!(attrs.len(), 2);
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        ::std::vec::Vec::<$crate::Attr>::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Attr::new($key, $value)),+]
    };
}

/// Error 与 Fatal 事件上附带的错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorDetail {
    /// 调用方没有传入错误，字段仍然存在但为空
    Absent,
    /// 错误的 `Display` 文本
    Message(String),
}

impl ErrorDetail {
    /// 从可选错误构建
    pub fn from_error(err: Option<&dyn std::error::Error>) -> Self {
        match err {
            Some(err) => Self::Message(err.to_string()),
            None => Self::Absent,
        }
    }

    /// 错误文本
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Absent => None,
            Self::Message(msg) => Some(msg),
        }
    }

    /// 编码后的字段值，缺失时为 `null`
    pub fn to_value(&self) -> Value {
        match self {
            Self::Absent => Value::Null,
            Self::Message(msg) => Value::String(msg.clone()),
        }
    }
}

/// 日志事件
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    /// 事件创建时间
    pub timestamp: DateTime<Utc>,
    /// 日志级别
    pub level: Level,
    /// 日志消息
    pub message: String,
    /// 按调用顺序排列的属性，允许重复键
    pub attributes: Vec<Attr>,
    /// 操作作用域
    pub operation_id: Option<String>,
    /// 错误附件，仅 Error/Fatal 事件携带
    pub error: Option<ErrorDetail>,
}

impl LogEvent {
    /// 以当前时间创建事件
    pub fn new<S: Into<String>>(level: Level, message: S) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            attributes: Vec::new(),
            operation_id: None,
            error: None,
        }
    }

    /// 追加属性
    pub fn with_attributes<I>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = Attr>,
    {
        self.attributes.extend(attrs);
        self
    }

    /// 设置操作作用域，空字符串表示无作用域
    pub fn with_operation<S: Into<String>>(mut self, operation_id: S) -> Self {
        let operation_id = operation_id.into();
        self.operation_id = (!operation_id.is_empty()).then_some(operation_id);
        self
    }

    /// 附加错误
    pub fn with_error(mut self, error: ErrorDetail) -> Self {
        self.error = Some(error);
        self
    }

    /// 获取属性值，重复键以最后一次为准
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .rev()
            .find(|attr| attr.key == key)
            .map(|attr| &attr.value)
    }

    /// 展平后的字段（不含固定字段）
    ///
    /// 属性按首次出现的位置排列，重复键取最后一次的值；随后依次是
    /// `operationID` 与 `error`。两种编码器都基于此结果输出。
    pub fn flattened_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();

        for attr in &self.attributes {
            let key = if is_fixed_key(&attr.key) {
                format!("{}{}", SHADOWED_KEY_PREFIX, attr.key)
            } else {
                attr.key.clone()
            };
            fields.insert(key, attr.value.clone());
        }

        if let Some(ref operation_id) = self.operation_id {
            fields.insert(
                OPERATION_ID_KEY.to_string(),
                Value::String(operation_id.clone()),
            );
        }

        if let Some(ref error) = self.error {
            fields.insert(ERROR_KEY.to_string(), error.to_value());
        }

        fields
    }
}

fn is_fixed_key(key: &str) -> bool {
    matches!(key, TIMESTAMP_KEY | LEVEL_KEY | MESSAGE_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_log_event_creation() {
        let event = LogEvent::new(Level::Info, "Test message")
            .with_attributes(crate::attrs!["user" => "alice"]);

        assert_eq!(event.level, Level::Info);
        assert_eq!(event.message, "Test message");
        assert_eq!(event.attribute("user"), Some(&Value::from("alice")));
        assert!(event.operation_id.is_none());
        assert!(event.error.is_none());
    }

    #[test]
    fn test_empty_operation_is_unscoped() {
        let event = LogEvent::new(Level::Info, "x").with_operation("");
        assert!(event.operation_id.is_none());

        let event = LogEvent::new(Level::Info, "x").with_operation("op-1");
        assert_eq!(event.operation_id.as_deref(), Some("op-1"));
    }

    #[test]
    fn test_duplicate_keys_later_wins() {
        let event = LogEvent::new(Level::Debug, "dup").with_attributes(crate::attrs![
            "a" => 1,
            "b" => 2,
            "a" => 3,
        ]);

        assert_eq!(event.attribute("a"), Some(&Value::from(3)));

        let fields = event.flattened_fields();
        let keys: Vec<&String> = fields.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(fields["a"], Value::from(3));
    }

    #[test]
    fn test_fixed_keys_are_not_replaced() {
        let event = LogEvent::new(Level::Info, "real")
            .with_attributes(crate::attrs!["msg" => "fake", "level" => "DEBUG"]);

        let fields = event.flattened_fields();
        assert_eq!(fields["attr.msg"], Value::from("fake"));
        assert_eq!(fields["attr.level"], Value::from("DEBUG"));
        assert!(!fields.contains_key("msg"));
    }

    #[test]
    fn test_operation_and_error_are_flattened_last() {
        let err = io::Error::new(io::ErrorKind::Other, "disk full");
        let event = LogEvent::new(Level::Error, "write failed")
            .with_attributes(crate::attrs!["operationID" => "spoofed", "path" => "/tmp/x"])
            .with_operation("op-7")
            .with_error(ErrorDetail::from_error(Some(&err)));

        let fields = event.flattened_fields();
        assert_eq!(fields[OPERATION_ID_KEY], Value::from("op-7"));
        assert_eq!(fields[ERROR_KEY], Value::from("disk full"));
    }

    #[test]
    fn test_absent_error_is_null() {
        let event = LogEvent::new(Level::Error, "bad").with_error(ErrorDetail::from_error(None));

        let fields = event.flattened_fields();
        assert!(fields.contains_key(ERROR_KEY));
        assert_eq!(fields[ERROR_KEY], Value::Null);
        assert_eq!(event.error.as_ref().and_then(|e| e.message()), None);
    }

    #[test]
    fn test_empty_attrs_macro() {
        let attrs = crate::attrs![];
        assert!(attrs.is_empty());
    }
}
