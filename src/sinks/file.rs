//! 持久化文件 Sink
//!
//! 每个事件编码为一行 JSON 追加到目标文件。写入在锁内完成，
//! 并发追加不会在单条记录内部交错。写入中途失败留下的半条记录
//! 会在下一条记录前用换行结束，之后的记录仍各占一行。

use crate::config::FileSinkConfig;
use crate::core::event::LogEvent;
use crate::core::format::encode_json;
use crate::core::level::Level;
use crate::error::Result;
use crate::sinks::traits::{LogSink, SinkResult};
use crate::utils::FileTools;
use std::fmt;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// 持久化 sink 的默认阈值：记录全部级别
pub const DEFAULT_FILE_THRESHOLD: Level = Level::Debug;

/// 持久化文件 Sink
pub struct FileSink {
    path: Option<PathBuf>,
    threshold: Level,
    auto_flush: bool,
    writer: Mutex<RecordWriter>,
}

// 写入目标与"上一条记录是否未写完"标记
struct RecordWriter {
    inner: Box<dyn Write + Send>,
    torn: bool,
}

impl RecordWriter {
    fn new(inner: Box<dyn Write + Send>) -> Self {
        Self { inner, torn: false }
    }
}

impl FileSink {
    /// 以追加模式打开目标文件，缺失的父目录会被创建
    ///
    /// 目标无法打开时返回 I/O 错误。
    pub fn open<P: AsRef<Path>>(path: P, threshold: Level) -> Result<Self> {
        Self::open_with(path.as_ref(), threshold, true, true)
    }

    /// 根据配置打开，未配置级别时记录全部级别
    pub fn from_config(config: &FileSinkConfig) -> Result<Self> {
        Self::open_with(
            &config.path,
            config.threshold(),
            config.create_dirs,
            config.auto_flush,
        )
    }

    fn open_with(
        path: &Path,
        threshold: Level,
        create_dirs: bool,
        auto_flush: bool,
    ) -> Result<Self> {
        let file = FileTools::open_file_append(path, create_dirs)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            threshold,
            auto_flush,
            writer: Mutex::new(RecordWriter::new(Box::new(BufWriter::new(file)))),
        })
    }

    /// 使用任意写入目标，主要用于测试
    pub fn with_writer<W>(writer: W, threshold: Level) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            path: None,
            threshold,
            auto_flush: true,
            writer: Mutex::new(RecordWriter::new(Box::new(writer))),
        }
    }

    /// 设置是否每次写入后立即刷新
    pub fn with_auto_flush(mut self, auto_flush: bool) -> Self {
        self.auto_flush = auto_flush;
        self
    }

    /// 目标文件路径
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl fmt::Debug for FileSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.path)
            .field("threshold", &self.threshold)
            .field("auto_flush", &self.auto_flush)
            .finish_non_exhaustive()
    }
}

impl LogSink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    fn threshold(&self) -> Level {
        self.threshold
    }

    fn write(&self, event: &LogEvent) -> SinkResult<()> {
        let mut line = encode_json(event)?;
        line.push('\n');

        // panic 后锁中毒，写入状态仍由 torn 标记描述，可以继续使用
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if writer.torn {
            line.insert(0, '\n');
        }

        writer.torn = true;
        writer.inner.write_all(line.as_bytes())?;
        writer.torn = false;

        if self.auto_flush {
            writer.inner.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> SinkResult<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.inner.flush()?;
        Ok(())
    }
}
