//! # 服务层
//!
//! ## 设计思路
//!
//! `MemeService` 把“来源解析 → 合成 → 入库 → 画廊列表”串成一次请求。
//! 合成是纯计算，放到阻塞线程池上执行，多个请求可并行；
//! 存储由 `ArtifactStore` 内部的锁串行化，服务层不再额外加锁。
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<MemeConfig>>` 支持运行时切换缩放档位。
//! - 单次请求内使用“同一配置快照”，避免处理中途配置漂移。
//! - 记录 `load/compose/store/total` 阶段耗时，便于性能诊断。
//! - 请求中途失败时没有任何作品入库。

use std::sync::{Arc, RwLock};
use std::time::Instant;

use base64::{Engine as _, engine::general_purpose};
use serde::Serialize;

use super::loader::load_source;
use super::templates::TemplateCatalog;
use super::{ImageSource, MemeCompositor, MemeConfig, ResizeProfile};
use crate::error::AppError;
use crate::gallery::{Artifact, ArtifactStore};
use crate::settings::AppSettings;
use crate::storage;

/// 一次生成请求。
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub source: ImageSource,
    pub top_text: String,
    pub bottom_text: String,
    /// 是否写入画廊；关闭时只返回字节。
    pub persist: bool,
}

impl GenerateRequest {
    pub fn new(source: ImageSource, top_text: impl Into<String>, bottom_text: impl Into<String>) -> Self {
        Self {
            source,
            top_text: top_text.into(),
            bottom_text: bottom_text.into(),
            persist: true,
        }
    }
}

/// 生成结果：作品（若已入库）、当前画廊与 PNG 字节。
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutcome {
    pub artifact: Option<Artifact>,
    pub gallery: Vec<Artifact>,
    #[serde(skip)]
    pub png: Vec<u8>,
}

impl GenerateOutcome {
    /// 以 Data URL 形式内联返回 PNG。
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(&self.png))
    }
}

/// 表情包服务。
pub struct MemeService {
    config: Arc<RwLock<MemeConfig>>,
    templates: TemplateCatalog,
    store: Arc<ArtifactStore>,
    gallery_window: usize,
}

impl MemeService {
    pub fn new(config: MemeConfig, templates: TemplateCatalog, store: ArtifactStore, gallery_window: usize) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            templates,
            store: Arc::new(store),
            gallery_window,
        }
    }

    /// 按设置创建服务：校验配置、准备目录、打开作品存储。
    pub fn from_settings(settings: &AppSettings) -> Result<Self, AppError> {
        let config = settings.to_meme_config()?;
        let output_dir = storage::ensure_dir(&settings.output_dir)?;
        let store = ArtifactStore::open(output_dir, settings.gallery_capacity)?;
        Ok(Self::new(
            config,
            TemplateCatalog::new(&settings.templates_dir),
            store,
            settings.gallery_window,
        ))
    }

    fn config_snapshot(&self) -> Result<MemeConfig, AppError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| AppError::Config("配置读取锁已中毒".to_string()))
    }

    pub fn set_resize_profile(&self, profile: ResizeProfile) -> Result<(), AppError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| AppError::Config("配置写入锁已中毒".to_string()))?;
        config.apply_resize_profile(profile);
        log::info!("⚙️ 已切换缩放档位：{:?}（filter={:?}）", profile, config.resize_filter);
        Ok(())
    }

    pub fn resize_profile(&self) -> Result<ResizeProfile, AppError> {
        Ok(self.config_snapshot()?.resize_profile())
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn templates(&self) -> &TemplateCatalog {
        &self.templates
    }

    /// 当前画廊。
    pub fn gallery(&self) -> Result<Vec<Artifact>, AppError> {
        Ok(self.store.list(self.gallery_window)?)
    }

    /// 处理主入口。
    ///
    /// # 示例
    /// ```no_run
    /// use meme_generator::meme::{GenerateRequest, ImageSource, MemeService};
    /// use meme_generator::settings::AppSettings;
    ///
    /// # async fn demo() -> Result<(), meme_generator::error::AppError> {
    /// let service = MemeService::from_settings(&AppSettings::default())?;
    /// let outcome = service
    ///     .generate(GenerateRequest::new(ImageSource::Template("meme1.jpg".into()), "top", "bottom"))
    ///     .await?;
    /// println!("{} gallery items", outcome.gallery.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateOutcome, AppError> {
        let config = self.config_snapshot()?;
        let total_start = Instant::now();

        let load_start = Instant::now();
        let raw = load_source(request.source, &self.templates, &config)?;
        let source_hint = raw.source_hint;
        let load_elapsed = load_start.elapsed();

        let compose_start = Instant::now();
        let compositor = MemeCompositor::new(config);
        let (top, bottom) = (request.top_text, request.bottom_text);
        let png = tokio::task::spawn_blocking(move || compositor.compose(&raw.bytes, &top, &bottom)).await??;
        let compose_elapsed = compose_start.elapsed();

        let store_start = Instant::now();
        let artifact = if request.persist {
            let store = Arc::clone(&self.store);
            let bytes = png.clone();
            Some(tokio::task::spawn_blocking(move || store.append(&bytes)).await??)
        } else {
            None
        };
        let gallery = self.gallery()?;
        let store_elapsed = store_start.elapsed();

        log::info!(
            "✅ 表情包生成完成 - 来源: {} load={}ms compose={}ms store={}ms total={}ms",
            source_hint,
            load_elapsed.as_millis(),
            compose_elapsed.as_millis(),
            store_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(GenerateOutcome {
            artifact,
            gallery,
            png,
        })
    }
}
