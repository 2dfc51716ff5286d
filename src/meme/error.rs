//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载合成链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//! `code()` / `stage()` 为命令层提供稳定的结构化字段。

/// 表情包合成统一错误类型。
///
/// 该类型会在命令层被上转为 `AppError` 或 `CommandError`。
#[derive(Debug, thiserror::Error)]
pub enum MemeError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("模板错误：{0}")]
    Template(String),

    #[error("文件错误：{0}")]
    FileSystem(String),
}

impl MemeError {
    /// 稳定错误码，供命令层输出。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Encode(_) => "encode",
            Self::InvalidFormat(_) => "invalid_format",
            Self::ResourceLimit(_) => "resource_limit",
            Self::Template(_) => "template",
            Self::FileSystem(_) => "file_system",
        }
    }

    /// 出错所在阶段：`load`（来源解析）或 `compose`（解码/绘制/编码）。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Template(_) | Self::FileSystem(_) | Self::InvalidFormat(_) => "load",
            Self::Decode(_) | Self::Encode(_) | Self::ResourceLimit(_) => "compose",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_stages_are_stable() {
        let decode = MemeError::Decode("bad".into());
        assert_eq!(decode.code(), "decode");
        assert_eq!(decode.stage(), "compose");

        let template = MemeError::Template("missing".into());
        assert_eq!(template.code(), "template");
        assert_eq!(template.stage(), "load");
    }
}
