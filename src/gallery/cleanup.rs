use std::fs;
use std::path::PathBuf;

/// 淘汰清理结果。
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: usize,
    pub failed: Vec<PathBuf>,
}

/// 删除被淘汰作品的文件。
///
/// 文件已不存在视为成功；其他失败只记录日志，不向上传播。
pub(crate) fn remove_evicted_files(paths: impl IntoIterator<Item = PathBuf>) -> CleanupReport {
    let mut report = CleanupReport::default();

    for path in paths {
        match fs::remove_file(&path) {
            Ok(_) => report.removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => report.removed += 1,
            Err(e) => {
                log::warn!("⚠️ 删除旧作品失败 '{}': {}", path.display(), e);
                report.failed.push(path);
            }
        }
    }

    report
}
