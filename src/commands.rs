//! # 命令层
//!
//! 命令层仅做参数接收与结果返回，不承载业务逻辑。
//! 所有实际处理交由 `MemeService`，错误统一转换为可序列化的 `CommandError`。

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::AppError;
use crate::gallery::Artifact;
use crate::meme::{GenerateOutcome, GenerateRequest, ImageSource, MemeService};
use crate::settings::{save_settings_to_path, AppSettings};
use crate::storage::{self, StorageInfo};

#[derive(Debug, Clone, Serialize)]
pub struct CommandError {
    pub code: &'static str,
    pub stage: &'static str,
    pub message: String,
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        Self {
            code: error.code(),
            stage: error.stage(),
            message: error.to_string(),
        }
    }
}

/// 生成一张表情包并返回作品与画廊。
pub async fn generate_meme(
    service: &MemeService,
    source: ImageSource,
    top_text: String,
    bottom_text: String,
    persist: bool,
) -> Result<GenerateOutcome, CommandError> {
    let request = GenerateRequest {
        source,
        top_text,
        bottom_text,
        persist,
    };
    Ok(service.generate(request).await?)
}

pub fn list_gallery(service: &MemeService) -> Result<Vec<Artifact>, CommandError> {
    Ok(service.gallery()?)
}

pub fn list_templates(service: &MemeService) -> Result<Vec<String>, CommandError> {
    service
        .templates()
        .list()
        .map_err(|e| CommandError::from(AppError::from(e)))
}

/// 输出目录占用与画廊容量。
#[derive(Debug, Clone, Serialize)]
pub struct GalleryInfo {
    #[serde(flatten)]
    pub storage: StorageInfo,
    pub capacity: usize,
    pub templates_dir: String,
}

pub fn storage_info(service: &MemeService) -> Result<GalleryInfo, CommandError> {
    let store = service.store();
    Ok(GalleryInfo {
        storage: storage::dir_info(store.dir())?,
        capacity: store.capacity(),
        templates_dir: service.templates().dir().display().to_string(),
    })
}

/// 写出设置文件；已存在时需要 `overwrite`。
pub fn init_settings(path: &Path, settings: &AppSettings, overwrite: bool) -> Result<PathBuf, CommandError> {
    if path.exists() && !overwrite {
        return Err(AppError::Config(format!("设置文件已存在：{}", path.display())).into());
    }
    settings.to_meme_config()?;
    save_settings_to_path(path, settings)?;
    log::info!("📝 已写出设置文件：{}", path.display());
    Ok(path.to_path_buf())
}
