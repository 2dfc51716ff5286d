//! # 表情包合成模块
//!
//! ## 设计思路
//!
//! `MemeCompositor` 只负责“字节进、字节出”的纯函数式合成，不依赖也不修改任何存储。
//! 处理链路固定为：
//! 1. 解码源图
//! 2. 缩放到统一宽度（高度等比）
//! 3. 两行字幕转大写
//! 4. 顶部字幕：`(0, top_offset)`，居中框为整幅图
//! 5. 底部字幕：`(0, height - bottom_offset)`，居中框为整幅图
//! 6. 编码为 PNG
//!
//! 合成器不含可变共享状态，可在多个线程上并行调用。

use image::RgbaImage;

use super::outline::draw_outlined;
use super::source::{Caption, VerticalAnchor};
use super::{MemeConfig, MemeError};

/// 表情包合成器。
#[derive(Debug, Clone, Default)]
pub struct MemeCompositor {
    config: MemeConfig,
}

impl MemeCompositor {
    pub fn new(config: MemeConfig) -> Self {
        Self { config }
    }

    /// 合成主入口。
    ///
    /// # 示例
    /// ```no_run
    /// use meme_generator::meme::{MemeCompositor, MemeConfig};
    ///
    /// let source = std::fs::read("templates/meme1.jpg")?;
    /// let png = MemeCompositor::new(MemeConfig::default()).compose(&source, "top", "bottom")?;
    /// assert!(!png.is_empty());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn compose(&self, source_bytes: &[u8], top_text: &str, bottom_text: &str) -> Result<Vec<u8>, MemeError> {
        let canvas = self.render(source_bytes, top_text, bottom_text)?;
        Self::encode_png(canvas)
    }

    /// 合成但不编码，返回绘制后的画布。
    pub fn render(&self, source_bytes: &[u8], top_text: &str, bottom_text: &str) -> Result<RgbaImage, MemeError> {
        let config = &self.config;
        let decoded = self.decode_source(source_bytes, config)?;
        let (raw_width, raw_height) = decoded.dimensions();
        let mut canvas = self.resize_to_canonical(decoded, config)?;

        for caption in [
            Caption::new(top_text, VerticalAnchor::Top),
            Caption::new(bottom_text, VerticalAnchor::Bottom),
        ] {
            self.draw_caption(&mut canvas, &caption);
        }

        log::debug!(
            "🖼️ 字幕绘制完成 - 原始尺寸: {}x{} 输出尺寸: {}x{}",
            raw_width,
            raw_height,
            canvas.width(),
            canvas.height()
        );

        Ok(canvas)
    }

    fn draw_caption(&self, canvas: &mut RgbaImage, caption: &Caption) {
        let (width, height) = canvas.dimensions();
        let y = caption.baseline_y(height, self.config.top_offset, self.config.bottom_offset);
        let style = &self.config.style;
        draw_outlined(canvas, &style.primary, &style.outline, &caption.text, 0, y, width, height);
    }
}
