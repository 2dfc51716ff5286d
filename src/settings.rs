//! 应用设置
//!
//! 设置以 JSON 文件保存，所有字段都有默认值；文件缺失或无法解析时回退到默认设置。
//! 命令行参数在加载之后覆盖对应字段。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::gallery::{DEFAULT_CAPACITY, DEFAULT_GALLERY_WINDOW};
use crate::meme::{parse_hex_color, CaptionStyle, MemeConfig, ResizeProfile, StyledFont, DEFAULT_GLYPH_HEIGHT};

pub const DEFAULT_SETTINGS_FILE: &str = "meme.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub output_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub gallery_capacity: usize,
    pub gallery_window: usize,
    pub glyph_height: u32,
    pub primary_color: String,
    pub outline_color: String,
    pub resize_profile: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("public/outputs"),
            templates_dir: PathBuf::from("public/templates"),
            gallery_capacity: DEFAULT_CAPACITY,
            gallery_window: DEFAULT_GALLERY_WINDOW,
            glyph_height: DEFAULT_GLYPH_HEIGHT,
            primary_color: "#FFFFFF".to_string(),
            outline_color: "#000000".to_string(),
            resize_profile: ResizeProfile::Balanced.as_str().to_string(),
        }
    }
}

impl AppSettings {
    /// 转换为合成配置，颜色与档位在此处校验。
    pub fn to_meme_config(&self) -> Result<MemeConfig, AppError> {
        if self.glyph_height < 8 {
            return Err(AppError::Config(format!("glyph_height 不能小于 8：{}", self.glyph_height)));
        }

        let primary = parse_hex_color(&self.primary_color)
            .map_err(|e| AppError::Config(format!("primary_color: {}", e)))?;
        let outline = parse_hex_color(&self.outline_color)
            .map_err(|e| AppError::Config(format!("outline_color: {}", e)))?;
        let profile = ResizeProfile::from_str(&self.resize_profile)
            .map_err(|e| AppError::Config(format!("resize_profile: {}", e)))?;

        let mut config = MemeConfig {
            style: CaptionStyle {
                primary: StyledFont::new(self.glyph_height, primary),
                outline: StyledFont::new(self.glyph_height, outline),
            },
            ..MemeConfig::default()
        };
        config.apply_resize_profile(profile);
        Ok(config)
    }
}

/// 从文件加载设置；不存在或损坏时返回默认值。
pub fn load_settings_from_path(path: &Path) -> AppSettings {
    if !path.exists() {
        return AppSettings::default();
    }

    match fs::read_to_string(path).map(|content| serde_json::from_str::<AppSettings>(&content)) {
        Ok(Ok(settings)) => settings,
        Ok(Err(e)) => {
            log::warn!("解析设置文件失败，使用默认设置 '{}': {}", path.display(), e);
            AppSettings::default()
        }
        Err(e) => {
            log::warn!("读取设置文件失败，使用默认设置 '{}': {}", path.display(), e);
            AppSettings::default()
        }
    }
}

pub fn save_settings_to_path(path: &Path, settings: &AppSettings) -> Result<(), AppError> {
    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::Config(format!("序列化设置失败: {}", e)))?;
    fs::write(path, content)?;
    Ok(())
}
