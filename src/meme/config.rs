//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `MemeConfig`，保证合成行为可观测、可调整、可测试。
//! 缩放档位（quality / balanced / speed）作为高层语义，映射到底层滤镜。
//!
//! ## 实现思路
//!
//! - `Default` 提供与原版画面一致的参数（宽 768、上 50、下 125、64px 字高、白字黑边）。
//! - `ResizeProfile` 负责档位字符串解析与反向输出。
//! - `parse_hex_color` 供设置文件把 `#RRGGBB[AA]` 转为像素颜色。

use image::Rgba;
use image::imageops::FilterType;

use super::MemeError;
use super::font::StyledFont;

/// 画布统一宽度（像素）。
pub const CANONICAL_WIDTH: u32 = 768;
/// 上方字幕距顶部的固定偏移。
pub const TOP_CAPTION_OFFSET: u32 = 50;
/// 下方字幕距底部的固定偏移。
pub const BOTTOM_CAPTION_OFFSET: u32 = 125;
/// 默认字形高度。
pub const DEFAULT_GLYPH_HEIGHT: u32 = 64;

/// 一对字体：主色（正文）与描边色（光晕）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionStyle {
    pub primary: StyledFont,
    pub outline: StyledFont,
}

impl CaptionStyle {
    /// 同一字高下的白字黑边组合。
    pub fn light_on_dark(glyph_height: u32) -> Self {
        Self {
            primary: StyledFont::new(glyph_height, Rgba([255, 255, 255, 255])),
            outline: StyledFont::new(glyph_height, Rgba([0, 0, 0, 255])),
        }
    }
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self::light_on_dark(DEFAULT_GLYPH_HEIGHT)
    }
}

/// 合成配置。
///
/// 字段覆盖了读取、解码、缩放与字幕绘制四个阶段。
#[derive(Debug, Clone)]
pub struct MemeConfig {
    /// 输出画布宽度，高度按比例推导。
    pub canonical_width: u32,
    /// 上方字幕顶边距。
    pub top_offset: u32,
    /// 下方字幕距底边的距离。
    pub bottom_offset: u32,
    /// 字幕字体组合。
    pub style: CaptionStyle,
    /// 缩放滤镜策略。
    pub resize_filter: FilterType,
    /// 上传/模板原始字节的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 统一宽度画布的内存上限（RGBA，字节），只拦截极端长宽比。
    pub max_output_bytes: u64,
}

impl Default for MemeConfig {
    fn default() -> Self {
        Self {
            canonical_width: CANONICAL_WIDTH,
            top_offset: TOP_CAPTION_OFFSET,
            bottom_offset: BOTTOM_CAPTION_OFFSET,
            style: CaptionStyle::default(),
            resize_filter: FilterType::Triangle,
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            max_output_bytes: 1024 * 1024 * 1024,
        }
    }
}

impl MemeConfig {
    /// 基于当前滤镜反推缩放档位。
    pub fn resize_profile(&self) -> ResizeProfile {
        match self.resize_filter {
            FilterType::Nearest => ResizeProfile::Speed,
            FilterType::Triangle => ResizeProfile::Balanced,
            _ => ResizeProfile::Quality,
        }
    }

    /// 应用指定缩放档位。
    pub fn apply_resize_profile(&mut self, profile: ResizeProfile) {
        self.resize_filter = match profile {
            ResizeProfile::Quality => FilterType::CatmullRom,
            ResizeProfile::Balanced => FilterType::Triangle,
            ResizeProfile::Speed => FilterType::Nearest,
        };
    }
}

/// 缩放档位（面向用户语义）。
///
/// - `Quality`：CatmullRom，边缘更锐
/// - `Balanced`：双线性，默认
/// - `Speed`：最近邻
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeProfile {
    Quality,
    Balanced,
    Speed,
}

impl ResizeProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```
    /// use meme_generator::meme::ResizeProfile;
    ///
    /// let p = ResizeProfile::from_str("Balanced")?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), meme_generator::meme::MemeError>(())
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(profile: &str) -> Result<Self, MemeError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(MemeError::InvalidFormat(format!(
                "未知缩放档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

/// 解析 `#RRGGBB` 或 `#RRGGBBAA`（`#` 可省略）。
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>, MemeError> {
    let hex = value.trim().trim_start_matches('#');
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(MemeError::InvalidFormat(format!("无效颜色：{}", value)));
    }

    let channel = |index: usize| {
        u8::from_str_radix(&hex[index * 2..index * 2 + 2], 16)
            .map_err(|_| MemeError::InvalidFormat(format!("无效颜色：{}", value)))
    };

    let alpha = if hex.len() == 8 { channel(3)? } else { 255 };
    Ok(Rgba([channel(0)?, channel(1)?, channel(2)?, alpha]))
}
