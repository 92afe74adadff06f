//! 实用工具模块
//!
//! 提供各种辅助功能和工具函数

pub mod background_info;
pub mod file_tools;

pub use background_info::BackgroundInfo;
pub use file_tools::FileTools;
