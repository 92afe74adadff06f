//! 格式化
//!
//! 负责把 [`LogEvent`] 编码成两种输出格式：
//! - 持久化格式：每行一个 JSON 对象，属性展平为顶层字段
//! - 控制台格式：单行 `key=value` 文本，面向人阅读

use crate::core::event::{LogEvent, LEVEL_KEY, MESSAGE_KEY, TIMESTAMP_KEY};
use crate::core::level::Level;
use crate::error::{LoggoError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use serde_json::{Map, Value};

/// 时间戳格式：RFC 3339，微秒精度，UTC
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// 编码为单行 JSON（不含换行符）
pub fn encode_json(event: &LogEvent) -> std::result::Result<String, serde_json::Error> {
    let mut record = Map::new();
    record.insert(
        TIMESTAMP_KEY.to_string(),
        Value::String(format_timestamp(&event.timestamp)),
    );
    record.insert(
        LEVEL_KEY.to_string(),
        Value::String(event.level.as_str().to_string()),
    );
    record.insert(
        MESSAGE_KEY.to_string(),
        Value::String(event.message.clone()),
    );
    record.extend(event.flattened_fields());

    serde_json::to_string(&Value::Object(record))
}

/// 编码为控制台文本行（不含换行符）
pub fn encode_text(event: &LogEvent, colored: bool) -> String {
    let level = if colored {
        colorize_level(event.level)
    } else {
        event.level.as_str().to_string()
    };

    let mut line = format!(
        "{}={} {}={} {}={}",
        TIMESTAMP_KEY,
        format_timestamp(&event.timestamp),
        LEVEL_KEY,
        level,
        MESSAGE_KEY,
        quote_if_needed(&event.message)
    );

    for (key, value) in event.flattened_fields() {
        line.push(' ');
        line.push_str(&quote_if_needed(&key));
        line.push('=');
        line.push_str(&quote_if_needed(&text_value(&value)));
    }

    line
}

fn colorize_level(level: Level) -> String {
    let name = level.as_str();
    match level {
        Level::Debug => name.cyan().to_string(),
        Level::Info => name.green().to_string(),
        Level::Warn => name.yellow().to_string(),
        Level::Error => name.red().to_string(),
    }
}

/// 字段值的文本形式；`null`（缺失的错误）渲染为空字符串
fn text_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || c == '=' || c == '"' || c.is_control())
}

fn quote_if_needed(s: &str) -> String {
    if !needs_quoting(s) {
        return s.to_string();
    }

    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{{{:04x}}}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// 解码后的持久化记录
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    /// 除 `timestamp`/`level`/`msg` 之外的所有字段
    pub fields: Map<String, Value>,
}

impl DecodedRecord {
    /// 获取字段
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// 解码一行持久化记录
pub fn decode_json_line(line: &str) -> Result<DecodedRecord> {
    let mut fields = match serde_json::from_str::<Value>(line.trim())? {
        Value::Object(map) => map,
        other => {
            return Err(LoggoError::config(format!(
                "durable record is not a JSON object: {}",
                other
            )))
        }
    };

    let timestamp = match fields.remove(TIMESTAMP_KEY) {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .map_err(|e| LoggoError::config(format!("invalid timestamp '{}': {}", s, e)))?
            .with_timezone(&Utc),
        _ => return Err(LoggoError::config("durable record has no timestamp")),
    };

    let level = match fields.remove(LEVEL_KEY) {
        Some(Value::String(s)) => s.parse::<Level>().map_err(LoggoError::InvalidLogLevel)?,
        _ => return Err(LoggoError::config("durable record has no level")),
    };

    let message = match fields.remove(MESSAGE_KEY) {
        Some(Value::String(s)) => s,
        _ => return Err(LoggoError::config("durable record has no msg")),
    };

    Ok(DecodedRecord {
        timestamp,
        level,
        message,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::ErrorDetail;

    fn create_test_event() -> LogEvent {
        LogEvent::new(Level::Info, "Test message")
            .with_attributes(crate::attrs!["user" => "alice", "count" => 3])
            .with_operation("op-42")
    }

    #[test]
    fn test_json_field_order() {
        let line = encode_json(&create_test_event()).unwrap();
        assert!(line.starts_with("{\"timestamp\":"));
        let level_pos = line.find("\"level\":\"INFO\"").unwrap();
        let msg_pos = line.find("\"msg\":\"Test message\"").unwrap();
        let user_pos = line.find("\"user\":\"alice\"").unwrap();
        let op_pos = line.find("\"operationID\":\"op-42\"").unwrap();
        assert!(level_pos < msg_pos && msg_pos < user_pos && user_pos < op_pos);
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_json_decode() {
        let event = create_test_event();
        let decoded = decode_json_line(&encode_json(&event).unwrap()).unwrap();

        assert_eq!(decoded.level, Level::Info);
        assert_eq!(decoded.message, "Test message");
        assert_eq!(decoded.field("count"), Some(&Value::from(3)));
        assert_eq!(decoded.field("operationID"), Some(&Value::from("op-42")));
        assert_eq!(
            format_timestamp(&decoded.timestamp),
            format_timestamp(&event.timestamp)
        );
    }

    #[test]
    fn test_json_absent_error_is_null() {
        let event = LogEvent::new(Level::Error, "bad").with_error(ErrorDetail::Absent);
        let line = encode_json(&event).unwrap();
        assert!(line.contains("\"error\":null"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_json_line("not json").is_err());
        assert!(decode_json_line("[1,2]").is_err());
        assert!(decode_json_line(r#"{"level":"INFO","msg":"x"}"#).is_err());
        assert!(decode_json_line(
            r#"{"timestamp":"2024-01-01T00:00:00Z","level":"LOUD","msg":"x"}"#
        )
        .is_err());
    }

    #[test]
    fn test_text_format() {
        let line = encode_text(&create_test_event(), false);
        assert!(line.starts_with("timestamp="));
        assert!(line.contains(" level=INFO "));
        assert!(line.contains(" msg=\"Test message\""));
        assert!(line.contains(" user=alice"));
        assert!(line.contains(" count=3"));
        assert!(line.ends_with(" operationID=op-42"));
    }

    #[test]
    fn test_text_absent_error_is_empty() {
        let event = LogEvent::new(Level::Error, "bad").with_error(ErrorDetail::Absent);
        let line = encode_text(&event, false);
        assert!(line.contains(" msg=bad"));
        assert!(line.ends_with(" error=\"\""));
    }

    #[test]
    fn test_text_quoting() {
        assert_eq!(quote_if_needed("plain"), "plain");
        assert_eq!(quote_if_needed(""), "\"\"");
        assert_eq!(quote_if_needed("a b"), "\"a b\"");
        assert_eq!(quote_if_needed("k=v"), "\"k=v\"");
        assert_eq!(quote_if_needed("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote_if_needed("line1\nline2"), "\"line1\\nline2\"");
    }

    #[test]
    fn test_colored_level() {
        colored::control::set_override(true);
        let line = encode_text(&LogEvent::new(Level::Warn, "w"), true);
        colored::control::unset_override();
        assert!(line.contains("\x1b["));
        assert!(line.contains("WARN"));
    }
}
