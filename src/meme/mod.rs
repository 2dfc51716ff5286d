//! # 表情包合成模块（meme）
//!
//! ## 设计思路
//!
//! 该模块将“来源解析 → 解码缩放 → 字幕描边绘制 → PNG 编码 → 服务编排”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `service`：承载可注入状态（`MemeService`），编排整次请求
//! - `loader`：把上传字节或模板名解析为校验过的原始字节
//! - `templates`：模板目录的列举与安全解析
//! - `compositor`：纯函数式合成入口
//! - `pipeline`：解码、像素限制、统一宽度缩放、PNG 编码
//! - `outline`：8 方向光晕 + 主色正文
//! - `font`：点阵字形的单行居中渲染
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! 命令行 / commands.rs
//!    ↓
//! service.rs（配置快照 + 阶段耗时日志）
//!    ├─ loader.rs（上传校验 / 模板解析）
//!    ├─ compositor.rs（阻塞线程池）
//!    │    ├─ pipeline.rs（解码 + 缩放 + 编码）
//!    │    └─ outline.rs → font.rs
//!    └─ gallery::ArtifactStore（追加 + 淘汰 + 画廊窗口）
//! ```

mod compositor;
mod config;
mod error;
mod font;
mod loader;
mod outline;
mod pipeline;
mod service;
mod source;
mod templates;

pub use compositor::MemeCompositor;
pub use config::{
    parse_hex_color, CaptionStyle, MemeConfig, ResizeProfile, BOTTOM_CAPTION_OFFSET, CANONICAL_WIDTH,
    DEFAULT_GLYPH_HEIGHT, TOP_CAPTION_OFFSET,
};
pub use error::MemeError;
pub use font::{render, StyledFont};
pub use outline::{draw_outlined, HALO_OFFSETS};
pub use pipeline::scaled_height;
pub use service::{GenerateOutcome, GenerateRequest, MemeService};
pub use source::{Caption, ImageSource, VerticalAnchor};
pub use templates::TemplateCatalog;

/// 使用默认配置合成一张表情包。
pub fn compose(source_bytes: &[u8], top_text: &str, bottom_text: &str) -> Result<Vec<u8>, MemeError> {
    MemeCompositor::default().compose(source_bytes, top_text, bottom_text)
}
