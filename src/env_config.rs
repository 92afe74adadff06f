//! 环境变量配置模块
//!
//! 用环境变量覆盖已加载的 [`LoggerConfig`]：
//!
//! | 变量 | 作用 |
//! |------|------|
//! | `LOGGO_LEVEL` | Logger 级别 |
//! | `LOGGO_FILE` | 持久化目标路径 |
//! | `LOGGO_CONSOLE_LEVEL` | 控制台阈值 |
//! | `LOGGO_CONSOLE` | `0`/`false`/`off` 关闭控制台 |

use crate::config::LoggerConfig;
use crate::core::level::Level;
use crate::error::{LoggoError, Result};
use std::env;
use std::path::PathBuf;

pub const ENV_LEVEL: &str = "LOGGO_LEVEL";
pub const ENV_FILE: &str = "LOGGO_FILE";
pub const ENV_CONSOLE_LEVEL: &str = "LOGGO_CONSOLE_LEVEL";
pub const ENV_CONSOLE: &str = "LOGGO_CONSOLE";

/// 环境变量配置管理器
pub struct EnvConfig;

impl EnvConfig {
    /// 从进程环境变量覆盖配置
    pub fn apply(config: &mut LoggerConfig) -> Result<()> {
        Self::apply_with(config, |key| env::var(key).ok())
    }

    /// 使用自定义查找函数覆盖配置，空值视为未设置
    pub fn apply_with<F>(config: &mut LoggerConfig, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(level) = get(ENV_LEVEL) {
            config.level = parse_level(&level)?;
        }

        if let Some(path) = get(ENV_FILE) {
            config.file.path = PathBuf::from(path);
        }

        if let Some(level) = get(ENV_CONSOLE_LEVEL) {
            config.console.level = parse_level(&level)?;
        }

        if let Some(flag) = get(ENV_CONSOLE) {
            config.console.enabled = parse_switch(&flag)?;
        }

        Ok(())
    }
}

fn parse_level(value: &str) -> Result<Level> {
    value.parse::<Level>().map_err(LoggoError::InvalidLogLevel)
}

fn parse_switch(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => Err(LoggoError::config(format!(
            "{} 的值无效: {}",
            ENV_CONSOLE, other
        ))),
    }
}
