//! 控制台输出 Sink 实现
//!
//! 提供将日志事件以单行 `key=value` 文本输出到标准输出或标准错误的功能，
//! 支持彩色级别和级别过滤。默认只显示 Info 及以上级别。

use crate::config::{ConsoleSinkConfig, ConsoleTarget};
use crate::core::event::LogEvent;
use crate::core::format::encode_text;
use crate::core::level::Level;
use crate::sinks::traits::{LogSink, SinkResult};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// 控制台 sink 的默认阈值
pub const DEFAULT_CONSOLE_THRESHOLD: Level = Level::Info;

/// 控制台输出 Sink
pub struct ConsoleSink {
    target: ConsoleTarget,
    threshold: Level,
    colored: bool,
    /// 自定义写入目标；为空时写入进程的 stdout/stderr
    writer: Option<Mutex<Box<dyn Write + Send>>>,
}

impl ConsoleSink {
    /// 创建写入标准输出的控制台 Sink
    pub fn new() -> Self {
        Self::with_target(ConsoleTarget::Stdout)
    }

    /// 创建写入指定流的控制台 Sink
    pub fn with_target(target: ConsoleTarget) -> Self {
        Self {
            target,
            threshold: DEFAULT_CONSOLE_THRESHOLD,
            colored: false,
            writer: None,
        }
    }

    /// 根据配置创建
    pub fn from_config(config: &ConsoleSinkConfig) -> Self {
        Self::with_target(config.target)
            .with_threshold(config.level)
            .with_colors(config.colored)
    }

    /// 使用任意写入目标
    pub fn with_writer<W>(writer: W, threshold: Level) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            target: ConsoleTarget::Stdout,
            threshold,
            colored: false,
            writer: Some(Mutex::new(Box::new(writer))),
        }
    }

    /// 设置级别阈值
    pub fn with_threshold(mut self, threshold: Level) -> Self {
        self.threshold = threshold;
        self
    }

    /// 设置是否为级别着色
    pub fn with_colors(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    fn write_line(&self, line: &str) -> SinkResult<()> {
        if let Some(ref writer) = self.writer {
            let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
            writeln!(writer, "{}", line)?;
            writer.flush()?;
            return Ok(());
        }

        match self.target {
            ConsoleTarget::Stdout => {
                let mut handle = io::stdout().lock();
                writeln!(handle, "{}", line)?;
                handle.flush()?;
            }
            ConsoleTarget::Stderr => {
                let mut handle = io::stderr().lock();
                writeln!(handle, "{}", line)?;
                handle.flush()?;
            }
        }
        Ok(())
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("target", &self.target)
            .field("threshold", &self.threshold)
            .field("colored", &self.colored)
            .field("custom_writer", &self.writer.is_some())
            .finish()
    }
}

impl LogSink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    fn threshold(&self) -> Level {
        self.threshold
    }

    fn write(&self, event: &LogEvent) -> SinkResult<()> {
        let line = encode_text(event, self.colored);
        self.write_line(&line)
    }

    fn flush(&self) -> SinkResult<()> {
        if let Some(ref writer) = self.writer {
            let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
            writer.flush()?;
            return Ok(());
        }

        match self.target {
            ConsoleTarget::Stdout => io::stdout().flush()?,
            ConsoleTarget::Stderr => io::stderr().flush()?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemorySink;

    #[test]
    fn test_console_sink_defaults() {
        let sink = ConsoleSink::new();
        assert_eq!(sink.threshold(), Level::Info);
        assert_eq!(sink.name(), "console");
        assert!(!sink.admits(Level::Debug));
        assert!(sink.admits(Level::Info));
    }

    #[test]
    fn test_console_sink_from_config() {
        let config = ConsoleSinkConfig {
            enabled: true,
            level: Level::Warn,
            target: ConsoleTarget::Stderr,
            colored: true,
        };
        let sink = ConsoleSink::from_config(&config);
        assert_eq!(sink.threshold(), Level::Warn);
        assert_eq!(sink.target, ConsoleTarget::Stderr);
        assert!(sink.colored);
    }

    #[test]
    fn test_console_sink_writes_text_line() {
        let buffer = MemorySink::new();
        let sink = ConsoleSink::with_writer(buffer.clone(), Level::Info);

        sink.write(
            &LogEvent::new(Level::Info, "hello world")
                .with_attributes(crate::attrs!["user" => "alice"]),
        )
        .unwrap();

        let output = buffer.contents();
        assert!(output.ends_with('\n'));
        assert!(output.contains("level=INFO"));
        assert!(output.contains("msg=\"hello world\""));
        assert!(output.contains("user=alice"));
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_console_sink_real_stream() {
        let sink = ConsoleSink::with_target(ConsoleTarget::Stderr);
        assert!(sink.write(&LogEvent::new(Level::Warn, "to stderr")).is_ok());
        assert!(sink.flush().is_ok());
    }

    struct PanickingWriter {
        inner: MemorySink,
        armed: bool,
    }

    impl Write for PanickingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if std::mem::take(&mut self.armed) {
                panic!("terminal gone");
            }
            self.inner.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }

    #[test]
    fn test_console_sink_recovers_after_writer_panic() {
        let buffer = MemorySink::new();
        let writer = PanickingWriter {
            inner: buffer.clone(),
            armed: true,
        };
        let sink = ConsoleSink::with_writer(writer, Level::Info);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            sink.write(&LogEvent::new(Level::Info, "lost"))
        }));
        assert!(result.is_err());

        sink.write(&LogEvent::new(Level::Warn, "still here")).unwrap();
        assert!(buffer.contents().contains("msg=\"still here\""));
    }
}
