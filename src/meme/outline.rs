//! # 描边合成模块
//!
//! 先以描边字体在 8 个固定偏移处各绘制一遍，形成 3 像素光晕，
//! 最后在原位置以主色绘制正文。偏移集合固定，顺序不可调换。

use image::RgbaImage;

use super::font::{self, StyledFont};

/// 光晕偏移：左右、上下与四个对角，各 3 像素。
pub const HALO_OFFSETS: [(i64, i64); 8] = [
    (-3, -3),
    (3, -3),
    (-3, 3),
    (3, 3),
    (0, -3),
    (0, 3),
    (-3, 0),
    (3, 0),
];

/// 绘制带描边的单行字幕。
#[allow(clippy::too_many_arguments)]
pub fn draw_outlined(
    buffer: &mut RgbaImage,
    primary: &StyledFont,
    outline: &StyledFont,
    text: &str,
    x: i64,
    y: i64,
    box_width: u32,
    box_height: u32,
) {
    for (dx, dy) in HALO_OFFSETS {
        font::render(buffer, outline, text, x + dx, y + dy, box_width, box_height);
    }
    font::render(buffer, primary, text, x, y, box_width, box_height);
}
