//! # 表情包生成器 — 命令行入口
//!
//! 本文件仅负责日志初始化、参数解析与命令分发。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use meme_generator::commands::{self, CommandError};
use meme_generator::error::AppError;
use meme_generator::meme::{ImageSource, MemeService};
use meme_generator::settings::{self, AppSettings};

#[derive(Debug, Parser)]
#[command(name = "meme-generator", version, about = "Caption images and keep a small gallery")]
struct Cli {
    /// 设置文件路径（默认 ./meme.json，不存在时使用内置默认值）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 作品输出目录
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// 模板目录
    #[arg(long, global = true)]
    templates_dir: Option<PathBuf>,

    /// 缩放档位：quality / balanced / speed
    #[arg(long, global = true)]
    resize_profile: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 生成一张表情包
    Generate(GenerateArgs),
    /// 列出画廊
    Gallery,
    /// 列出可用模板
    Templates,
    /// 输出目录占用信息
    Info,
    /// 写出当前生效的设置文件
    Init {
        /// 覆盖已存在的设置文件
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// 上方字幕
    #[arg(long, default_value = "")]
    top: String,

    /// 下方字幕
    #[arg(long, default_value = "")]
    bottom: String,

    /// 上传的图片文件
    #[arg(long, conflicts_with = "template", required_unless_present = "template")]
    upload: Option<PathBuf>,

    /// 模板文件名，如 meme1.jpg
    #[arg(long)]
    template: Option<String>,

    /// 不写入画廊
    #[arg(long)]
    no_save: bool,

    /// 额外输出 Data URL
    #[arg(long)]
    inline: bool,
}

#[derive(Serialize)]
struct GenerateReport {
    #[serde(flatten)]
    outcome: meme_generator::meme::GenerateOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_url: Option<String>,
}

fn settings_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| PathBuf::from(settings::DEFAULT_SETTINGS_FILE))
}

fn load_settings(cli: &Cli) -> AppSettings {
    let mut loaded = settings::load_settings_from_path(&settings_path(cli));

    if let Some(dir) = &cli.output_dir {
        loaded.output_dir = dir.clone();
    }
    if let Some(dir) = &cli.templates_dir {
        loaded.templates_dir = dir.clone();
    }
    if let Some(profile) = &cli.resize_profile {
        loaded.resize_profile = profile.clone();
    }
    loaded
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CommandError::from(AppError::Config(format!("序列化输出失败: {}", e))))?;
    println!("{json}");
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let settings = load_settings(&cli);
    if let Command::Init { force } = cli.command {
        let path = commands::init_settings(&settings_path(&cli), &settings, force)?;
        return print_json(&path);
    }

    let service = MemeService::from_settings(&settings)?;

    match cli.command {
        Command::Generate(args) => {
            let source = match (args.upload, args.template) {
                (Some(path), _) => ImageSource::Uploaded(std::fs::read(&path).map_err(AppError::from)?),
                (None, Some(name)) => ImageSource::Template(name),
                (None, None) => {
                    return Err(AppError::Config("需要 --upload 或 --template".to_string()).into());
                }
            };

            let outcome = commands::generate_meme(&service, source, args.top, args.bottom, !args.no_save).await?;
            let data_url = args.inline.then(|| outcome.data_url());
            print_json(&GenerateReport { outcome, data_url })
        }
        Command::Gallery => print_json(&commands::list_gallery(&service)?),
        Command::Templates => print_json(&commands::list_templates(&service)?),
        Command::Info => print_json(&commands::storage_info(&service)?),
        Command::Init { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("命令: {:?}", cli.command);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ 命令执行失败: {}", err.message);
            match serde_json::to_string(&err) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{}", err.message),
            }
            ExitCode::FAILURE
        }
    }
}
