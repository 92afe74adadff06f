//! 进程终止能力
//!
//! `fatal` 通过此 trait 终止进程，测试中可以替换为记录型实现。

use std::fmt::Debug;

/// `fatal` 使用的退出码
pub const FATAL_EXIT_CODE: i32 = 1;

/// 终止能力
pub trait Terminate: Send + Sync + Debug {
    /// 以指定退出码终止
    ///
    /// 真实实现不会返回；替身实现记录调用后返回。
    fn terminate(&self, code: i32);
}

/// 调用 [`std::process::exit`] 的默认实现
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl Terminate for ProcessExit {
    fn terminate(&self, code: i32) {
        std::process::exit(code)
    }
}
