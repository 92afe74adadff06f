//! 定义 loggo 日志框架的所有配置结构体。
//!
//! 配置通常从 TOML 加载，再由 [`crate::env_config::EnvConfig`] 用环境变量覆盖。

use crate::core::level::Level;
use crate::error::{LoggoError, Result};
use crate::sinks::file::DEFAULT_FILE_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// --- 辅助函数，用于提供配置项的默认值 ---
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_console_level() -> Level {
    Level::Info
}

/// 控制台输出流
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// Logger 的完整配置
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggerConfig {
    /// Logger 自身的级别，决定 `is_debug_enabled`
    #[serde(default)]
    pub level: Level,

    /// 持久化 sink，必填
    pub file: FileSinkConfig,

    #[serde(default)]
    pub console: ConsoleSinkConfig,

    /// 附加到每个事件上的静态字段，位于调用方属性之前
    #[serde(default)]
    pub context_fields: BTreeMap<String, serde_json::Value>,

    #[serde(default = "default_false")]
    pub include_pid: bool,

    #[serde(default = "default_false")]
    pub include_hostname: bool,
}

impl LoggerConfig {
    /// 以持久化目标路径创建默认配置
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            level: Level::default(),
            file: FileSinkConfig::new(path),
            console: ConsoleSinkConfig::default(),
            context_fields: BTreeMap::new(),
            include_pid: false,
            include_hostname: false,
        }
    }
}

/// 持久化文件 sink 配置
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileSinkConfig {
    pub path: PathBuf,

    /// 未设置时记录全部级别（[`DEFAULT_FILE_THRESHOLD`]）
    #[serde(default)]
    pub level: Option<Level>,

    #[serde(default = "default_true")]
    pub auto_flush: bool,

    #[serde(default = "default_true")]
    pub create_dirs: bool,
}

impl FileSinkConfig {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            level: None,
            auto_flush: true,
            create_dirs: true,
        }
    }

    /// 持久化 sink 实际使用的阈值
    pub fn threshold(&self) -> Level {
        self.level.unwrap_or(DEFAULT_FILE_THRESHOLD)
    }
}

/// 控制台 sink 配置
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConsoleSinkConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_console_level")]
    pub level: Level,

    #[serde(default)]
    pub target: ConsoleTarget,

    #[serde(default = "default_false")]
    pub colored: bool,
}

impl Default for ConsoleSinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_console_level(),
            target: ConsoleTarget::default(),
            colored: false,
        }
    }
}

/// 用于从 TOML 文件加载 `LoggerConfig` 的辅助函数。
pub fn load_config_from_file(path: &Path) -> Result<LoggerConfig> {
    if !path.exists() {
        return Err(LoggoError::ConfigFileMissing(
            path.to_string_lossy().into_owned(),
        ));
    }

    let config_str = std::fs::read_to_string(path)?;
    load_config_from_str(&config_str)
}

/// 用于从 TOML 字符串加载 `LoggerConfig` 的辅助函数。
pub fn load_config_from_str(config_str: &str) -> Result<LoggerConfig> {
    let config: LoggerConfig = toml::from_str(config_str)?;
    Ok(config)
}

/// 验证配置的有效性。
pub fn validate_config(config: &LoggerConfig) -> Result<()> {
    let path = &config.file.path;

    if path.as_os_str().is_empty() {
        return Err(LoggoError::invalid_path("持久化目标路径不能为空"));
    }

    if path.is_dir() {
        return Err(LoggoError::invalid_path(format!(
            "持久化目标不能是目录: {:?}",
            path
        )));
    }

    if let Some(bad) = config.context_fields.keys().find(|k| k.trim().is_empty()) {
        return Err(LoggoError::config(format!(
            "上下文字段名不能为空: {:?}",
            bad
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_minimal_config_defaults() {
        let config = load_config_from_str(
            r#"
            [file]
            path = "/tmp/loggo/app.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.level, Level::Info);
        assert_eq!(config.file.level, None);
        assert!(config.file.auto_flush);
        assert!(config.file.create_dirs);
        assert!(config.console.enabled);
        assert_eq!(config.console.level, Level::Info);
        assert_eq!(config.console.target, ConsoleTarget::Stdout);
        assert!(!config.console.colored);
        assert!(config.context_fields.is_empty());
        assert!(!config.include_pid);
        assert!(!config.include_hostname);
        assert_eq!(config.file.threshold(), Level::Debug);
    }

    #[test]
    fn test_full_config() {
        let config = load_config_from_str(
            r#"
            level = "debug"
            include_pid = true

            [file]
            path = "/var/log/app.log"
            level = "WARN"
            auto_flush = false

            [console]
            level = "ERROR"
            target = "stderr"
            colored = true

            [context_fields]
            service = "scraper"
            shard = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.file.threshold(), Level::Warn);
        assert!(!config.file.auto_flush);
        assert_eq!(config.console.target, ConsoleTarget::Stderr);
        assert_eq!(config.console.level, Level::Error);
        assert_eq!(
            config.context_fields.get("service"),
            Some(&serde_json::Value::from("scraper"))
        );
        assert_eq!(
            config.context_fields.get("shard"),
            Some(&serde_json::Value::from(3))
        );
        assert!(config.include_pid);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result = load_config_from_str(
            r#"
            verbosity = 3
            [file]
            path = "/tmp/a.log"
            "#,
        );
        assert!(matches!(result, Err(LoggoError::TomlError { .. })));
    }

    #[test]
    fn test_missing_file_section_rejected() {
        assert!(load_config_from_str("level = \"INFO\"").is_err());
    }

    #[test]
    fn test_trace_level_rejected() {
        let result = load_config_from_str(
            r#"
            level = "TRACE"
            [file]
            path = "/tmp/a.log"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config_from_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(LoggoError::ConfigFileMissing(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("loggo.toml");
        std::fs::write(&config_path, "[file]\npath = \"/tmp/x.log\"\n").unwrap();

        let config = load_config_from_file(&config_path).unwrap();
        assert_eq!(config.file.path, PathBuf::from("/tmp/x.log"));
    }

    #[test]
    fn test_validate_config() {
        let temp_dir = TempDir::new().unwrap();

        let config = LoggerConfig::new(temp_dir.path().join("ok.log"));
        assert!(validate_config(&config).is_ok());

        let config = LoggerConfig::new("");
        assert!(matches!(
            validate_config(&config),
            Err(LoggoError::InvalidPath(_))
        ));

        let config = LoggerConfig::new(temp_dir.path());
        assert!(matches!(
            validate_config(&config),
            Err(LoggoError::InvalidPath(_))
        ));

        let mut config = LoggerConfig::new(temp_dir.path().join("ok.log"));
        config
            .context_fields
            .insert(" ".to_string(), serde_json::Value::Null);
        assert!(matches!(
            validate_config(&config),
            Err(LoggoError::ConfigError(_))
        ));
    }
}
