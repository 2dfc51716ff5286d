//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，合成链路的 `MemeError` 与存储层的 `StoreError`
//! 都通过 `From` 自动上转，服务层与命令层只面对这一个类型。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - `code()` / `stage()` 给命令层提供结构化字段。

use crate::gallery::StoreError;
use crate::meme::MemeError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 合成流水线错误（加载 / 解码 / 编码）
    #[error("{0}")]
    Meme(#[from] MemeError),

    /// 作品存储错误
    #[error("{0}")]
    Store(#[from] StoreError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置无效
    #[error("配置错误: {0}")]
    Config(String),

    /// 后台任务异常退出
    #[error("后台任务失败: {0}")]
    Task(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Meme(err) => err.code(),
            Self::Store(_) => "storage",
            Self::Io(_) => "io",
            Self::Config(_) => "config",
            Self::Task(_) => "task",
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::Meme(err) => err.stage(),
            Self::Store(_) | Self::Io(_) => "store",
            Self::Config(_) => "config",
            Self::Task(_) => "compose",
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meme_errors_keep_their_code_and_message() {
        let err: AppError = MemeError::Encode("boom".into()).into();
        assert_eq!(err.code(), "encode");
        assert_eq!(err.stage(), "compose");
        assert_eq!(err.to_string(), "编码错误：boom");
    }

    #[test]
    fn join_failures_become_task_errors() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime init failed");
        let join_error = runtime
            .block_on(runtime.spawn(async { panic!("worker crashed") }))
            .expect_err("task should panic");

        let err = AppError::from(join_error);
        assert_eq!(err.code(), "task");
        assert!(matches!(err, AppError::Task(_)));
    }
}
