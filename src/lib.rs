//! # 表情包生成器 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                命令行 (clap) / 外部调用方                │
//! │        generate ── gallery ── templates ── info          │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ Result<T, CommandError>（JSON 输出）
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ meme ─────── 来源解析 · 缩放 · 描边字幕 · PNG 编码     │
//! │  │                                                       │
//! │  ├─ gallery ──── 有序作品索引 · 容量淘汰 · 画廊窗口        │
//! │  │                                                       │
//! │  ├─ settings     JSON 设置文件                           │
//! │  ├─ storage      目录创建与占用统计                      │
//! │  └─ commands     薄命令层                                │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`meme`] | 合成流水线与 `MemeService` 编排 |
//! | [`gallery`] | `ArtifactStore`：追加、淘汰、画廊列表 |
//! | [`settings`] | 设置加载/保存与合成配置转换 |
//! | [`storage`] | 目录准备与占用统计 |
//! | [`commands`] | 命令层，错误转为 `CommandError` |

pub mod commands;
pub mod error;
pub mod gallery;
pub mod meme;
pub mod settings;
pub mod storage;
