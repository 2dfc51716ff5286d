//! # 作品存储
//!
//! ## 设计思路
//!
//! 内存中的有序索引是唯一的顺序来源，磁盘目录只负责保存字节。
//! 索引由一把 `Mutex` 独占：`append` 与淘汰串行执行，`list` 在同一把锁下
//! 克隆快照，不会读到“追加了一半”的状态。
//!
//! ## 实现思路
//!
//! - 打开时扫描一次目录，按文件名解析出的键排序重建索引，并立即执行容量约束。
//! - 写入先落到 `.tmp` 临时文件再重命名，失败时清掉临时文件，不留下半成品。
//! - 淘汰删除失败只记日志，不影响本次追加的结果。

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

use super::cleanup::remove_evicted_files;
use super::naming::ArtifactKey;
use super::StoreError;

/// 默认保留数量。
pub const DEFAULT_CAPACITY: usize = 10;
/// 默认画廊窗口。
pub const DEFAULT_GALLERY_WINDOW: usize = 9;

/// 一件已保存的作品（指向磁盘上的字节）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub id: String,
    pub file_name: String,
    pub path: PathBuf,
    pub size: u64,
    pub created_at: DateTime<Local>,
    #[serde(skip)]
    key: ArtifactKey,
}

impl Artifact {
    fn new(dir: &Path, key: ArtifactKey, size: u64) -> Self {
        let file_name = key.file_name();
        let created_at = Local
            .timestamp_millis_opt(key.millis)
            .single()
            .unwrap_or_else(Local::now);
        Self {
            id: key.to_string(),
            path: dir.join(&file_name),
            file_name,
            size,
            created_at,
            key,
        }
    }

    pub fn key(&self) -> ArtifactKey {
        self.key
    }
}

/// 画廊窗口：按旧到新排序后丢弃最旧的一件，再保留其余中最新的 `window` 件。
pub fn gallery_window<T: Clone>(oldest_first: &[T], window: usize) -> Vec<T> {
    let rest = oldest_first.get(1..).unwrap_or_default();
    let start = rest.len().saturating_sub(window);
    rest[start..].to_vec()
}

struct StoreIndex {
    entries: VecDeque<Artifact>,
    last_key: Option<ArtifactKey>,
}

/// 容量受限、按时间排序的作品存储。
pub struct ArtifactStore {
    dir: PathBuf,
    capacity: usize,
    index: Mutex<StoreIndex>,
}

impl ArtifactStore {
    /// 打开（必要时创建）存储目录并重建索引。
    pub fn open(dir: impl Into<PathBuf>, capacity: usize) -> Result<Self, StoreError> {
        let dir = dir.into();
        if capacity == 0 {
            return Err(StoreError::InvalidCapacity);
        }
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))?.flatten() {
            let name = entry.file_name();
            let Some(key) = name.to_str().and_then(ArtifactKey::parse_file_name) else {
                log::debug!("跳过非作品文件: {:?}", name);
                continue;
            };
            let metadata = match entry.metadata() {
                Ok(metadata) if metadata.is_file() => metadata,
                _ => continue,
            };
            entries.push(Artifact::new(&dir, key, metadata.len()));
        }
        entries.sort_by_key(Artifact::key);

        let last_key = entries.last().map(Artifact::key);
        let store = Self {
            dir,
            capacity,
            index: Mutex::new(StoreIndex {
                entries: entries.into(),
                last_key,
            }),
        };

        {
            let mut index = store.lock()?;
            let evicted = store.evict_over_capacity(&mut index);
            log::info!(
                "🗂️ 作品存储已打开 - 目录: {} 现有: {} 启动淘汰: {}",
                store.dir.display(),
                index.entries.len(),
                evicted
            );
        }

        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreIndex>, StoreError> {
        self.index.lock().map_err(|_| StoreError::Lock)
    }

    /// 保存一件作品并执行容量约束。
    pub fn append(&self, bytes: &[u8]) -> Result<Artifact, StoreError> {
        self.append_at(bytes, Local::now().timestamp_millis())
    }

    fn append_at(&self, bytes: &[u8], now_millis: i64) -> Result<Artifact, StoreError> {
        let mut index = self.lock()?;

        let key = ArtifactKey::next_after(index.last_key, now_millis);
        let artifact = Artifact::new(&self.dir, key, bytes.len() as u64);
        write_atomically(&artifact.path, bytes)?;

        index.last_key = Some(key);
        index.entries.push_back(artifact.clone());
        let evicted = self.evict_over_capacity(&mut index);

        log::info!(
            "💾 已保存作品 {}（{} 字节），当前 {} / {}，淘汰 {}",
            artifact.id,
            artifact.size,
            index.entries.len(),
            self.capacity,
            evicted
        );

        Ok(artifact)
    }

    /// 淘汰超出容量的最旧作品，返回淘汰数量。
    fn evict_over_capacity(&self, index: &mut StoreIndex) -> usize {
        let excess = index.entries.len().saturating_sub(self.capacity);
        if excess == 0 {
            return 0;
        }

        let evicted: Vec<PathBuf> = index.entries.drain(..excess).map(|a| a.path).collect();
        let report = remove_evicted_files(evicted);
        if !report.failed.is_empty() {
            log::warn!("⚠️ {} 个旧作品文件未能删除，已从画廊移除", report.failed.len());
        }
        excess
    }

    /// 全部作品快照（旧到新）。
    pub fn snapshot(&self) -> Result<Vec<Artifact>, StoreError> {
        Ok(self.lock()?.entries.iter().cloned().collect())
    }

    /// 画廊列表，规则见 [`gallery_window`]。
    pub fn list(&self, window: usize) -> Result<Vec<Artifact>, StoreError> {
        let mut index = self.lock()?;
        Ok(gallery_window(index.entries.make_contiguous(), window))
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// 读取作品字节。
    pub fn read(&self, id: &str) -> Result<Vec<u8>, StoreError> {
        let path = {
            let index = self.lock()?;
            index
                .entries
                .iter()
                .find(|a| a.id == id)
                .map(|a| a.path.clone())
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?
        };
        fs::read(&path).map_err(|e| StoreError::io(&path, e))
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("png.tmp");
    if let Err(e) = fs::write(&tmp, bytes).and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(StoreError::io(path, e));
    }
    Ok(())
}
