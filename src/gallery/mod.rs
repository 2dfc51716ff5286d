//! # 画廊模块（gallery）
//!
//! ## 设计思路
//!
//! 作品的新旧顺序由 `ArtifactStore` 独占维护的有序索引决定，
//! 不依赖文件修改时间；输出目录只在打开时扫描一次。
//!
//! - `naming`：文件名 ↔ 排序键
//! - `store`：追加、淘汰、画廊窗口
//! - `cleanup`：删除被淘汰的文件（失败不致命）

mod cleanup;
mod naming;
mod store;

use std::path::Path;

pub use cleanup::CleanupReport;
pub use naming::ArtifactKey;
pub use store::{gallery_window, Artifact, ArtifactStore, DEFAULT_CAPACITY, DEFAULT_GALLERY_WINDOW};

/// 存储错误。
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("存储 I/O 失败 '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("作品索引锁已中毒")]
    Lock,

    #[error("作品不存在：{0}")]
    NotFound(String),

    #[error("画廊容量必须大于 0")]
    InvalidCapacity,
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
