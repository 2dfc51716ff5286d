//! # 字形渲染模块
//!
//! ## 设计思路
//!
//! 使用 `font8x8` 的 8×8 点阵字库，按字高整数倍放大，单行绘制、水平居中。
//! 不做换行与字距调整，超宽文本直接越界（画布边缘裁剪）。
//!
//! ## 实现思路
//!
//! - 每个字符占 `8 * scale` 宽的固定单元，整行宽度 = 字符数 × 单元宽。
//! - 起点 `x + (box_width - line_width) / 2`，可能为负数，逐像素裁剪。
//! - 无字形的字符回退为 `?`，渲染永不失败。

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgba, RgbaImage};

/// 点阵字库的原始单元尺寸。
const CELL: u32 = 8;
/// 无对应字形时使用的替代字符。
const FALLBACK_GLYPH: char = '?';

/// 带颜色与字高的点阵字体。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledFont {
    /// 字形高度（像素），向下取整到 8 的倍数，最小 8。
    pub glyph_height: u32,
    pub color: Rgba<u8>,
}

impl StyledFont {
    pub fn new(glyph_height: u32, color: Rgba<u8>) -> Self {
        Self { glyph_height, color }
    }

    /// 点阵放大倍数。
    pub fn scale(&self) -> u32 {
        (self.glyph_height / CELL).max(1)
    }

    /// 单个字符的水平步进。
    pub fn advance(&self) -> u32 {
        CELL * self.scale()
    }

    /// 整行文本的像素宽度。
    pub fn line_width(&self, text: &str) -> u64 {
        text.chars().count() as u64 * self.advance() as u64
    }
}

fn glyph_rows(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get(FALLBACK_GLYPH))
        .unwrap_or([0; 8])
}

/// 居中后的行起点；余数向下取整，超宽与未超宽时多出的 1 像素都落在右侧。
fn line_start_x(x: i64, box_width: u32, line_width: i64) -> i64 {
    x + (box_width as i64 - line_width).div_euclid(2)
}

/// 在 `[x, x + box_width]` 内水平居中绘制单行文本，字形顶边位于 `y`。
///
/// 低于 `y + box_height` 的行不绘制；超出画布的像素直接丢弃。
pub fn render(
    buffer: &mut RgbaImage,
    font: &StyledFont,
    text: &str,
    x: i64,
    y: i64,
    box_width: u32,
    box_height: u32,
) {
    if text.is_empty() {
        return;
    }

    let scale = font.scale() as i64;
    let advance = font.advance() as i64;
    let line_width = font.line_width(text) as i64;
    let start_x = line_start_x(x, box_width, line_width);
    let bottom_limit = y + box_height as i64;
    let (width, height) = (buffer.width() as i64, buffer.height() as i64);

    for (index, ch) in text.chars().enumerate() {
        let origin_x = start_x + index as i64 * advance;
        if origin_x >= width || origin_x + advance <= 0 {
            continue;
        }

        for (row, &bits) in glyph_rows(ch).iter().enumerate() {
            for col in 0..CELL as i64 {
                if (bits >> col) & 1 == 0 {
                    continue;
                }

                let block_x = origin_x + col * scale;
                let block_y = y + row as i64 * scale;
                for py in block_y..block_y + scale {
                    if py < 0 || py >= height || py >= bottom_limit {
                        continue;
                    }
                    for px in block_x..block_x + scale {
                        if px < 0 || px >= width {
                            continue;
                        }
                        buffer.put_pixel(px as u32, py as u32, font.color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn painted_columns(buffer: &RgbaImage) -> (u32, u32) {
        let mut min_x = u32::MAX;
        let mut max_x = 0;
        for (x, _, pixel) in buffer.enumerate_pixels() {
            if *pixel != CLEAR {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
            }
        }
        (min_x, max_x)
    }

    #[test]
    fn empty_text_paints_nothing() {
        let mut buffer = RgbaImage::new(64, 32);
        render(&mut buffer, &StyledFont::new(16, RED), "", 0, 0, 64, 32);
        assert!(buffer.pixels().all(|p| *p == CLEAR));
    }

    #[test]
    fn single_glyph_is_centered_in_box() {
        let font = StyledFont::new(8, RED);
        let mut buffer = RgbaImage::new(40, 8);
        render(&mut buffer, &font, "I", 0, 0, 40, 8);

        // 单元起点 (40 - 8) / 2 = 16，'I' 的点阵占第 1..=4 列
        let (min_x, max_x) = painted_columns(&buffer);
        assert_eq!((min_x, max_x), (17, 20));
    }

    #[test]
    fn odd_remainder_always_falls_to_the_right() {
        assert_eq!(line_start_x(0, 41, 8), 16);
        assert_eq!(line_start_x(0, 11, 16), -3);
        assert_eq!(line_start_x(10, 11, 16), 7);
        assert_eq!(line_start_x(0, 8, 16), -4);
    }

    #[test]
    fn overflowing_line_is_clipped_evenly() {
        let font = StyledFont::new(8, RED);
        let mut buffer = RgbaImage::new(11, 8);
        render(&mut buffer, &font, "MM", 0, 0, 11, 8);

        // 行宽 16，起点 -3：左侧裁掉 3 列，右侧裁掉 2 列
        let mut reference = RgbaImage::new(16, 8);
        render(&mut reference, &font, "MM", 0, 0, 16, 8);
        for (x, y, pixel) in buffer.enumerate_pixels() {
            assert_eq!(pixel, reference.get_pixel(x + 3, y));
        }
    }

    #[test]
    fn glyph_height_scales_blocks() {
        let font = StyledFont::new(32, RED);
        assert_eq!(font.scale(), 4);
        assert_eq!(font.advance(), 32);
        assert_eq!(font.line_width("AB"), 64);

        let mut buffer = RgbaImage::new(32, 32);
        render(&mut buffer, &font, "A", 0, 0, 32, 32);
        let painted = buffer.pixels().filter(|p| **p == RED).count();
        assert_eq!(painted % 16, 0, "every font bit maps to a 4x4 block");
        assert!(painted > 0);
    }

    #[test]
    fn overflowing_text_is_clipped_without_panic() {
        let font = StyledFont::new(16, RED);
        let mut buffer = RgbaImage::new(20, 10);
        render(&mut buffer, &font, "WAY TOO LONG FOR THIS BOX", -5, -3, 20, 10);
        render(&mut buffer, &font, "X", 1_000, 1_000, 20, 10);
        assert!(buffer.pixels().any(|p| *p == RED));
    }

    #[test]
    fn box_height_limits_painted_rows() {
        let font = StyledFont::new(16, RED);
        let mut buffer = RgbaImage::new(16, 16);
        render(&mut buffer, &font, "M", 0, 0, 16, 4);
        for (_, y, pixel) in buffer.enumerate_pixels() {
            if *pixel == RED {
                assert!(y < 4);
            }
        }
    }

    #[test]
    fn unknown_characters_use_fallback_glyph() {
        let font = StyledFont::new(8, RED);
        let mut fallback = RgbaImage::new(8, 8);
        let mut question = RgbaImage::new(8, 8);
        render(&mut fallback, &font, "\u{1F600}", 0, 0, 8, 8);
        render(&mut question, &font, "?", 0, 0, 8, 8);
        assert_eq!(fallback, question);
    }
}
