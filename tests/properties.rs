//! 性质测试：阈值准入与持久化格式往返

use loggo::core::format::{decode_json_line, encode_json};
use loggo::testing::MemorySink;
use loggo::{Attr, ErrorDetail, FileSink, Level, LogEvent, LogSink, Logger};
use proptest::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

fn any_level() -> impl Strategy<Value = Level> {
    prop::sample::select(Level::ALL.to_vec())
}

fn attr_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        ".*".prop_map(Value::from),
        Just(Value::Null),
    ]
}

fn error_detail() -> impl Strategy<Value = ErrorDetail> {
    prop_oneof![
        Just(ErrorDetail::Absent),
        ".*".prop_map(ErrorDetail::Message),
    ]
}

// 不与固定字段或保留字段冲突的键
fn attr_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}".prop_filter("reserved key", |k| {
        !matches!(k.as_str(), "timestamp" | "level" | "msg" | "error")
    })
}

proptest! {
    #[test]
    fn sink_receives_iff_level_at_least_threshold(
        event_level in any_level(),
        threshold in any_level(),
    ) {
        let buffer = MemorySink::new();
        let sink = FileSink::with_writer(buffer.clone(), threshold);
        let logger = Logger::builder().sink(Arc::new(sink)).build();

        match event_level {
            Level::Debug => logger.debug("sample", vec![]),
            Level::Info => logger.info("sample", vec![]),
            Level::Warn => logger.warn("sample", vec![]),
            Level::Error => logger.error("sample", None, vec![]),
        }

        let received = !buffer.is_empty();
        prop_assert_eq!(received, event_level >= threshold);
    }

    #[test]
    fn durable_record_round_trips(
        level in any_level(),
        message in ".*",
        attrs in prop::collection::vec((attr_key(), attr_value()), 0..8),
        operation in prop::option::of("[A-Za-z0-9-]{1,36}"),
        error in prop::option::of(error_detail()),
    ) {
        let mut event = LogEvent::new(level, message.clone())
            .with_attributes(attrs.iter().map(|(k, v)| Attr::new(k.clone(), v.clone())));
        if let Some(ref op) = operation {
            event = event.with_operation(op.clone());
        }
        if let Some(ref detail) = error {
            event = event.with_error(detail.clone());
        }

        let line = encode_json(&event).unwrap();
        prop_assert!(!line.contains('\n'));
        let decoded = decode_json_line(&line).unwrap();

        prop_assert_eq!(decoded.level, level);
        prop_assert_eq!(&decoded.message, &message);

        // 重复键以最后一次为准
        let mut expected: BTreeMap<String, Value> = BTreeMap::new();
        for (k, v) in &attrs {
            expected.insert(k.clone(), v.clone());
        }
        for (k, v) in &expected {
            prop_assert_eq!(decoded.field(k), Some(v));
        }
        prop_assert_eq!(
            decoded.fields.len(),
            expected.len() + operation.iter().count() + error.iter().count()
        );

        match operation {
            Some(op) => prop_assert_eq!(decoded.field("operationID"), Some(&Value::from(op))),
            None => prop_assert_eq!(decoded.field("operationID"), None),
        }

        // 缺失的错误写为 null，字段依然存在
        match error {
            Some(ErrorDetail::Message(text)) => {
                prop_assert_eq!(decoded.field("error"), Some(&Value::from(text)))
            }
            Some(ErrorDetail::Absent) => {
                prop_assert_eq!(decoded.field("error"), Some(&Value::Null))
            }
            None => prop_assert_eq!(decoded.field("error"), None),
        }
    }

    #[test]
    fn admission_matches_total_order(a in any_level(), b in any_level()) {
        let sink = FileSink::with_writer(MemorySink::new(), b);
        prop_assert_eq!(sink.admits(a), a >= b);
    }
}
