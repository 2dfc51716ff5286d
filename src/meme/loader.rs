//! # 来源加载模块
//!
//! ## 设计思路
//!
//! 把 `ImageSource` 一次性解析成原始字节，合成器因此与来源无关。
//! 解码前先做廉价校验：空内容、体积上限、文件签名，尽早拒绝明显无效的输入。

use std::path::Path;

use super::source::{ImageSource, RawImageData};
use super::templates::TemplateCatalog;
use super::{MemeConfig, MemeError};

/// 解析来源并返回校验过的原始字节。
pub(crate) fn load_source(
    source: ImageSource,
    catalog: &TemplateCatalog,
    config: &MemeConfig,
) -> Result<RawImageData, MemeError> {
    match source {
        ImageSource::Uploaded(bytes) => load_from_upload(bytes, config),
        ImageSource::Template(name) => {
            let path = catalog.resolve(&name)?;
            load_from_file(&path, config)
        }
    }
}

fn load_from_upload(bytes: Vec<u8>, config: &MemeConfig) -> Result<RawImageData, MemeError> {
    log::info!("📤 读取上传图片 - 大小: {} 字节", bytes.len());

    validate_size(bytes.len() as u64, config)?;
    validate_image_signature(&bytes)?;

    Ok(RawImageData {
        bytes,
        source_hint: "upload",
    })
}

fn load_from_file(path: &Path, config: &MemeConfig) -> Result<RawImageData, MemeError> {
    log::info!("📁 读取模板图片 - 路径: {}", path.display());

    let metadata = std::fs::metadata(path)
        .map_err(|e| MemeError::FileSystem(format!("无法读取文件信息：{}", e)))?;
    validate_size(metadata.len(), config)?;

    let bytes = std::fs::read(path)
        .map_err(|e| MemeError::FileSystem(format!("无法读取图片文件：{}", e)))?;
    validate_image_signature(&bytes)?;

    Ok(RawImageData {
        bytes,
        source_hint: "template",
    })
}

fn validate_size(len: u64, config: &MemeConfig) -> Result<(), MemeError> {
    if len > config.max_file_size {
        return Err(MemeError::ResourceLimit(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            len as f64 / 1024.0 / 1024.0,
            config.max_file_size as f64 / 1024.0 / 1024.0
        )));
    }
    Ok(())
}

fn validate_image_signature(bytes: &[u8]) -> Result<(), MemeError> {
    if bytes.is_empty() {
        return Err(MemeError::InvalidFormat("图片内容为空".to_string()));
    }

    // 解码器能识别的格式一律放行，与直接合成的判定保持一致
    if image::guess_format(bytes).is_ok() {
        return Ok(());
    }

    match infer::get(bytes) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => Err(MemeError::Decode(format!(
            "不支持的图片格式：{}",
            kind.mime_type()
        ))),
        Some(kind) => Err(MemeError::Decode(format!(
            "文件签名不是图片类型：{}",
            kind.mime_type()
        ))),
        None => Err(MemeError::Decode("无法识别图片类型".to_string())),
    }
}
