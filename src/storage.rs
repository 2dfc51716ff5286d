//! 输出目录管理模块
//!
//! # 设计思路
//!
//! 统一管理作品与模板目录：不存在时自动创建，并提供占用统计。
//! 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// 存储目录信息
#[derive(Debug, Clone, Serialize)]
pub struct StorageInfo {
    pub path: String,
    pub total_size: u64,
    pub file_count: u64,
}

/// 确保目录存在并返回其路径。
pub fn ensure_dir(dir: &Path) -> Result<PathBuf, AppError> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .map_err(|e| AppError::Config(format!("创建目录 '{}' 失败: {}", dir.display(), e)))?;
    }
    Ok(dir.to_path_buf())
}

/// 获取目录信息（路径 + 占用大小 + 文件数）
pub fn dir_info(dir: &Path) -> Result<StorageInfo, AppError> {
    let mut total_size: u64 = 0;
    let mut file_count: u64 = 0;

    if dir.exists() {
        for entry in fs::read_dir(dir)?.flatten() {
            if let Ok(metadata) = entry.metadata() {
                if metadata.is_file() {
                    total_size += metadata.len();
                    file_count += 1;
                }
            }
        }
    }

    Ok(StorageInfo {
        path: dir.to_string_lossy().to_string(),
        total_size,
        file_count,
    })
}
