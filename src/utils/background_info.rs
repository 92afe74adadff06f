//! 背景信息获取模块
//!
//! 提供进程ID与主机名，用于配置开启时注入到每条日志的上下文字段。

/// 系统背景信息结构体
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackgroundInfo {
    /// 进程ID
    pub pid: u32,
    /// 主机名
    pub hostname: String,
}

impl BackgroundInfo {
    /// 创建新的背景信息实例
    ///
    /// # Examples
    ///
    /// ```
    /// use loggo::utils::background_info::BackgroundInfo;
    ///
    /// let info = BackgroundInfo::new();
    /// println!("Process ID: {}", info.pid);
    /// ```
    pub fn new() -> Self {
        Self {
            pid: get_pid(),
            hostname: get_hostname(),
        }
    }
}

/// 获取当前进程ID
pub fn get_pid() -> u32 {
    std::process::id()
}

/// 获取主机名，失败时返回 "unknown"
pub fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
