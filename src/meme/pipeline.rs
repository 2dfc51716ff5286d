//! # 解码、缩放与编码流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像 → 统一宽度 RGBA → PNG 字节”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 猜测格式并读取 header 尺寸
//! 2. 按像素/内存上限快速拒绝
//! 3. 完整解码为 RGBA
//! 4. 缩放到统一宽度，高度按比例四舍五入
//! 5. 编码为 PNG

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;

use super::{MemeCompositor, MemeConfig, MemeError};

/// 按统一宽度计算等比高度：`round(width * h / w)`，最小为 1。
pub fn scaled_height(target_width: u32, width: u32, height: u32) -> u32 {
    if width == 0 {
        return 1;
    }
    let scaled = (target_width as f64 * height as f64 / width as f64).round();
    (scaled as u32).max(1)
}

impl MemeCompositor {
    /// 将原始字节解码为 RGBA 画布。
    pub(crate) fn decode_source(&self, bytes: &[u8], config: &MemeConfig) -> Result<RgbaImage, MemeError> {
        image::guess_format(bytes)
            .map_err(|e| MemeError::Decode(format!("不支持的图片格式：{}", e)))?;

        let (header_width, header_height) = Self::inspect_dimensions_from_memory(bytes)?;
        Self::validate_pixel_limits(config, header_width, header_height)?;
        Self::validate_decoded_memory_limits(config, header_width, header_height)?;

        let decoded = image::load_from_memory(bytes)
            .map_err(|e| MemeError::Decode(format!("图片解码失败：{}", e)))?;

        Ok(decoded.to_rgba8())
    }

    /// 仅通过内存中的图片头信息读取宽高。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), MemeError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| MemeError::Decode(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| MemeError::Decode(format!("无法读取图片尺寸：{}", e)))
    }

    fn validate_pixel_limits(config: &MemeConfig, width: u32, height: u32) -> Result<(), MemeError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| MemeError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(MemeError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_decoded_memory_limits(config: &MemeConfig, width: u32, height: u32) -> Result<(), MemeError> {
        let estimated = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| MemeError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(MemeError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }

    /// 缩放到统一宽度，放大与缩小均允许。
    pub(crate) fn resize_to_canonical(&self, image: RgbaImage, config: &MemeConfig) -> Result<RgbaImage, MemeError> {
        let (width, height) = image.dimensions();
        let target_width = config.canonical_width.max(1);
        let target_height = scaled_height(target_width, width, height);

        if (width, height) == (target_width, target_height) {
            return Ok(image);
        }

        Self::validate_output_memory(config, target_width, target_height)?;

        log::debug!(
            "🧩 统一宽度缩放：{}x{} -> {}x{}（filter={:?}）",
            width,
            height,
            target_width,
            target_height,
            config.resize_filter
        );

        match Self::resize_with_fast_image_resize(&image, target_width, target_height, config.resize_filter) {
            Ok(resized) => Ok(resized),
            Err(err) => {
                log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::imageops::resize：{}", err);
                Ok(image::imageops::resize(
                    &image,
                    target_width,
                    target_height,
                    config.resize_filter,
                ))
            }
        }
    }

    /// 输出画布只受 `max_output_bytes` 约束，与解码阶段的像素上限无关。
    fn validate_output_memory(config: &MemeConfig, width: u32, height: u32) -> Result<(), MemeError> {
        let bytes = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| MemeError::ResourceLimit("输出画布内存估算溢出".to_string()))?;

        if bytes > config.max_output_bytes {
            return Err(MemeError::ResourceLimit(format!(
                "输出画布过大：{}x{}（{:.2} MB，限制：{:.2} MB）",
                width,
                height,
                bytes as f64 / 1024.0 / 1024.0,
                config.max_output_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }

    fn resize_with_fast_image_resize(
        image: &RgbaImage,
        target_width: u32,
        target_height: u32,
        filter: FilterType,
    ) -> Result<RgbaImage, MemeError> {
        let (src_width, src_height) = image.dimensions();

        let src_image = fr::images::Image::from_vec_u8(
            src_width,
            src_height,
            image.as_raw().clone(),
            fr::PixelType::U8x4,
        )
        .map_err(|e| MemeError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

        let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new().resize_alg(Self::to_resize_alg(filter));

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| MemeError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

        RgbaImage::from_raw(target_width, target_height, dst_image.into_vec())
            .ok_or_else(|| MemeError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
    }

    fn to_resize_alg(filter: FilterType) -> fr::ResizeAlg {
        match filter {
            FilterType::Nearest => fr::ResizeAlg::Nearest,
            FilterType::Triangle => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
            FilterType::CatmullRom => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
            FilterType::Gaussian => fr::ResizeAlg::Convolution(fr::FilterType::Mitchell),
            FilterType::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
        }
    }

    /// 编码为 PNG（无损）。
    pub(crate) fn encode_png(image: RgbaImage) -> Result<Vec<u8>, MemeError> {
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| MemeError::Encode(format!("PNG 编码失败：{}", e)))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn create_png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8, 255])
        });
        MemeCompositor::encode_png(img).expect("failed to encode test image")
    }

    #[test]
    fn scaled_height_rounds_to_nearest() {
        assert_eq!(scaled_height(768, 1024, 768), 576);
        assert_eq!(scaled_height(768, 1000, 333), 256);
        assert_eq!(scaled_height(768, 3, 2), 512);
        assert_eq!(scaled_height(768, 7, 3), 329);
        assert_eq!(scaled_height(768, 10_000, 1), 1);
    }

    #[test]
    fn decode_rejects_non_image_bytes() {
        let compositor = MemeCompositor::new(MemeConfig::default());
        let config = MemeConfig::default();
        let result = compositor.decode_source(b"definitely not a picture", &config);
        assert!(matches!(result, Err(MemeError::Decode(_))));
    }

    #[test]
    fn decode_rejects_truncated_png() {
        let compositor = MemeCompositor::new(MemeConfig::default());
        let config = MemeConfig::default();
        let mut png = create_png_bytes(64, 64);
        png.truncate(png.len() / 2);
        let result = compositor.decode_source(&png, &config);
        assert!(matches!(result, Err(MemeError::Decode(_))));
    }

    #[test]
    fn decode_rejects_too_many_pixels() {
        let config = MemeConfig {
            max_decoded_pixels: 10_000,
            ..MemeConfig::default()
        };
        let compositor = MemeCompositor::new(config.clone());
        let result = compositor.decode_source(&create_png_bytes(200, 200), &config);
        assert!(matches!(result, Err(MemeError::ResourceLimit(_))));
    }

    #[test]
    fn resize_handles_enlarge_and_reduce() {
        let config = MemeConfig::default();
        let compositor = MemeCompositor::new(config.clone());

        let small = compositor.decode_source(&create_png_bytes(100, 50), &config).expect("decode small");
        let enlarged = compositor.resize_to_canonical(small, &config).expect("enlarge");
        assert_eq!(enlarged.dimensions(), (768, 384));

        let large = compositor.decode_source(&create_png_bytes(1536, 1000), &config).expect("decode large");
        let reduced = compositor.resize_to_canonical(large, &config).expect("reduce");
        assert_eq!(reduced.dimensions(), (768, 500));
    }

    #[test]
    fn tall_source_upscales_beyond_decode_pixel_limit() {
        let config = MemeConfig {
            max_decoded_pixels: 100_000,
            ..MemeConfig::default()
        };
        let compositor = MemeCompositor::new(config.clone());

        let narrow = compositor.decode_source(&create_png_bytes(20, 400), &config).expect("decode narrow");
        let resized = compositor.resize_to_canonical(narrow, &config).expect("tall output is allowed");
        assert_eq!(resized.dimensions(), (768, 15_360));
    }

    #[test]
    fn resize_rejects_only_extreme_output_canvas() {
        let config = MemeConfig {
            max_output_bytes: 768 * 1000 * 4,
            ..MemeConfig::default()
        };
        let compositor = MemeCompositor::new(config.clone());

        let fits = compositor.decode_source(&create_png_bytes(384, 500), &config).expect("decode");
        assert!(compositor.resize_to_canonical(fits, &config).is_ok());

        let sliver = compositor.decode_source(&create_png_bytes(10, 20), &config).expect("decode sliver");
        let result = compositor.resize_to_canonical(sliver, &config);
        assert!(matches!(result, Err(MemeError::ResourceLimit(_))));
    }

    #[test]
    fn resize_keeps_canonical_image_as_is() {
        let config = MemeConfig::default();
        let compositor = MemeCompositor::new(config.clone());
        let image = compositor.decode_source(&create_png_bytes(768, 300), &config).expect("decode");
        let before = image.clone();
        let after = compositor.resize_to_canonical(image, &config).expect("resize");
        assert_eq!(after, before);
    }
}
