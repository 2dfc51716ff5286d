//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `ImageSource` 表示外部来源语义（上传字节或模板名），在进入合成前一次性解析
//! - `RawImageData` 表示已加载但未解码的字节
//! - `Caption` 表示一行字幕及其锚点

/// 图片输入来源。
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// 用户上传的原始字节。
    Uploaded(Vec<u8>),
    /// 模板目录中的文件名。
    Template(String),
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 字幕的垂直锚点。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    Top,
    Bottom,
}

/// 一行字幕。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub text: String,
    pub anchor: VerticalAnchor,
}

impl Caption {
    /// 创建字幕，文本统一转为大写。
    pub fn new(text: &str, anchor: VerticalAnchor) -> Self {
        Self {
            text: text.to_uppercase(),
            anchor,
        }
    }

    /// 字形顶边的 y 坐标。
    ///
    /// 顶部字幕距上边 `top_offset`；底部字幕位于 `height - bottom_offset`，
    /// 图片矮于偏移量时可能为负，由渲染阶段裁剪。
    pub fn baseline_y(&self, image_height: u32, top_offset: u32, bottom_offset: u32) -> i64 {
        match self.anchor {
            VerticalAnchor::Top => top_offset as i64,
            VerticalAnchor::Bottom => image_height as i64 - bottom_offset as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_text_is_uppercased() {
        let caption = Caption::new("one does not simply", VerticalAnchor::Top);
        assert_eq!(caption.text, "ONE DOES NOT SIMPLY");
    }

    #[test]
    fn baseline_follows_anchor() {
        let top = Caption::new("a", VerticalAnchor::Top);
        let bottom = Caption::new("b", VerticalAnchor::Bottom);
        assert_eq!(top.baseline_y(576, 50, 125), 50);
        assert_eq!(bottom.baseline_y(576, 50, 125), 451);
        assert_eq!(bottom.baseline_y(100, 50, 125), -25);
    }
}
