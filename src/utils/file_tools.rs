//! 文件工具模块
//!
//! 持久化目标的打开与目录准备。

use crate::error::{LoggoError, Result};
use std::fs::{self, File, OpenOptions};
use std::path::Path;

/// 文件工具结构体
pub struct FileTools;

impl FileTools {
    /// 确保目录存在，如果不存在则创建
    pub fn ensure_directory_exists<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();

        if !path.exists() {
            fs::create_dir_all(path)?;
        } else if !path.is_dir() {
            return Err(LoggoError::invalid_path(format!(
                "路径存在但不是目录: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// 以追加模式打开文件，文件不存在时创建
    ///
    /// # 参数
    ///
    /// * `file_path` - 文件路径
    /// * `create_parents` - 是否创建缺失的父目录
    pub fn open_file_append<P: AsRef<Path>>(file_path: P, create_parents: bool) -> Result<File> {
        let file_path = file_path.as_ref();

        if file_path.as_os_str().is_empty() {
            return Err(LoggoError::invalid_path("日志文件路径为空"));
        }
        if file_path.is_dir() {
            return Err(LoggoError::invalid_path(format!(
                "路径是目录: {}",
                file_path.display()
            )));
        }

        if create_parents {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() {
                    Self::ensure_directory_exists(parent)?;
                }
            }
        }

        Ok(OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?)
    }
}
