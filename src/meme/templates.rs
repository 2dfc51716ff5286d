//! # 模板目录模块
//!
//! ## 设计思路
//!
//! 模板是放在固定目录里的一组图片文件，页面上供用户挑选。
//! 只允许按“文件名”引用模板，拒绝任何路径成分，防止目录穿越。
//!
//! ## 实现思路
//!
//! - 列表按自然顺序排序（`meme2` 排在 `meme10` 之前）。
//! - 仅识别常见图片扩展名，其他文件忽略。

use std::fs;
use std::path::{Path, PathBuf};

use super::MemeError;

const TEMPLATE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// 模板目录。
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    dir: PathBuf,
}

impl TemplateCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 列出全部模板文件名（自然排序）。
    ///
    /// 目录不存在时返回空列表。
    pub fn list(&self) -> Result<Vec<String>, MemeError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir)
            .map_err(|e| MemeError::FileSystem(format!("读取模板目录失败 '{}': {}", self.dir.display(), e)))?;

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_template_file(name))
            .collect();

        names.sort_by(|a, b| natord::compare(a, b));
        Ok(names)
    }

    /// 将模板名解析为磁盘路径。
    pub fn resolve(&self, name: &str) -> Result<PathBuf, MemeError> {
        let name = name.trim();
        // 兼容页面上的 "/templates/meme1.jpg" 写法
        let name = name.strip_prefix("/templates/").unwrap_or(name);

        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
            || !is_template_file(name)
        {
            return Err(MemeError::Template(format!("非法模板名：{}", name)));
        }

        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(MemeError::Template(format!("模板不存在：{}", name)));
        }

        Ok(path)
    }
}

fn is_template_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| TEMPLATE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let dir = std::env::temp_dir().join(format!("{}_{}", prefix, nanos));
        let _ = fs::create_dir_all(&dir);
        dir
    }

    #[test]
    fn list_sorts_naturally_and_skips_non_images() {
        let dir = unique_temp_dir("meme_templates_list");
        for name in ["meme10.jpg", "meme2.jpg", "meme1.PNG", "notes.txt"] {
            fs::write(dir.join(name), b"x").expect("write template");
        }
        fs::create_dir_all(dir.join("nested.jpg")).expect("create nested dir");

        let names = TemplateCatalog::new(&dir).list().expect("list templates");
        assert_eq!(names, vec!["meme1.PNG", "meme2.jpg", "meme10.jpg"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn list_of_missing_dir_is_empty() {
        let catalog = TemplateCatalog::new(std::env::temp_dir().join("meme_templates_absent_dir_x"));
        assert!(catalog.list().expect("list").is_empty());
    }

    #[test]
    fn resolve_rejects_traversal_and_unknown_names() {
        let dir = unique_temp_dir("meme_templates_resolve");
        fs::write(dir.join("meme1.jpg"), b"x").expect("write template");
        let catalog = TemplateCatalog::new(&dir);

        assert_eq!(catalog.resolve("meme1.jpg").ok(), Some(dir.join("meme1.jpg")));
        assert_eq!(catalog.resolve("/templates/meme1.jpg").ok(), Some(dir.join("meme1.jpg")));

        for bad in ["../secret.jpg", "a/b.jpg", "..\\x.png", "", "meme1.exe"] {
            assert!(matches!(catalog.resolve(bad), Err(MemeError::Template(_))), "{bad}");
        }
        assert!(matches!(catalog.resolve("meme9.jpg"), Err(MemeError::Template(_))));

        let _ = fs::remove_dir_all(&dir);
    }
}
