//! 目录遍历
//!
//! 扫描目录，筛选出可识别的图片与视频文件

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::utils::error::{AppError, AppResult};
use crate::utils::mime::mime_from_path;

/// 遍历结果
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkResult {
    /// 找到的媒体文件
    pub files: Vec<PathBuf>,
    /// 扫描的目录数
    pub dirs_scanned: usize,
    /// 跳过的文件数
    pub files_skipped: usize,
}

/// 遍历选项
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalkOptions {
    /// 是否递归扫描子目录
    pub recursive: bool,
    /// 排除的目录名
    pub exclude_dirs: Vec<String>,
    /// 最大扫描深度（0 表示无限制）
    pub max_depth: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            exclude_dirs: vec![
                ".git".to_string(),
                ".thumbnails".to_string(),
                "$RECYCLE.BIN".to_string(),
                "System Volume Information".to_string(),
            ],
            max_depth: 0,
        }
    }
}

/// 目录遍历器
pub struct MediaWalker {
    options: WalkOptions,
}

impl MediaWalker {
    pub fn new(options: WalkOptions) -> Self {
        Self { options }
    }

    /// 遍历单个目录
    pub fn walk(&self, path: &Path) -> AppResult<WalkResult> {
        if !path.is_dir() {
            return Err(AppError::InvalidPath(format!(
                "目录不存在或不是目录: {}",
                path.display()
            )));
        }

        let mut walker = WalkDir::new(path);
        if !self.options.recursive {
            walker = walker.max_depth(1);
        } else if self.options.max_depth > 0 {
            walker = walker.max_depth(self.options.max_depth);
        }

        let mut result = WalkResult::default();
        for entry in walker.into_iter().filter_entry(|e| self.should_include_entry(e, path)) {
            match entry {
                Ok(entry) if entry.file_type().is_dir() => result.dirs_scanned += 1,
                Ok(entry) => {
                    if is_media_file(entry.path()) {
                        result.files.push(entry.into_path());
                    } else {
                        result.files_skipped += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!("遍历错误: {}", e);
                    result.files_skipped += 1;
                }
            }
        }

        tracing::info!(
            "遍历完成: {} 个目录, {} 个媒体文件, {} 个跳过",
            result.dirs_scanned,
            result.files.len(),
            result.files_skipped
        );
        Ok(result)
    }

    fn should_include_entry(&self, entry: &walkdir::DirEntry, base_path: &Path) -> bool {
        if !entry.file_type().is_dir() || entry.path() == base_path {
            return true;
        }

        let name = entry.file_name().to_string_lossy();
        // 跳过隐藏目录
        if name.starts_with('.') {
            return false;
        }
        !self.options.exclude_dirs.iter().any(|d| d == &*name)
    }
}

/// 是否为可识别的图片或视频
pub fn is_media_file(path: &Path) -> bool {
    path.to_str().and_then(mime_from_path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_media_file() {
        assert!(is_media_file(Path::new("photo.jpg")));
        assert!(is_media_file(Path::new("photo.PNG")));
        assert!(is_media_file(Path::new("clip.mp4")));
        assert!(!is_media_file(Path::new("notes.txt")));
        assert!(!is_media_file(Path::new("no_extension")));
    }

    #[test]
    fn test_walk_directory() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        fs::write(base.join("a.jpg"), b"x").unwrap();
        fs::write(base.join("b.mp4"), b"x").unwrap();
        fs::write(base.join("c.txt"), b"x").unwrap();
        fs::create_dir(base.join("sub")).unwrap();
        fs::write(base.join("sub").join("d.png"), b"x").unwrap();
        fs::create_dir(base.join(".hidden")).unwrap();
        fs::write(base.join(".hidden").join("e.jpg"), b"x").unwrap();

        let result = MediaWalker::new(WalkOptions::default()).walk(base).unwrap();
        assert_eq!(result.files.len(), 3);
        assert_eq!(result.files_skipped, 1);
        assert!(!result.files.iter().any(|p| p.ends_with("e.jpg")));
    }

    #[test]
    fn test_walk_non_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        fs::write(base.join("a.jpg"), b"x").unwrap();
        fs::create_dir(base.join("sub")).unwrap();
        fs::write(base.join("sub").join("b.jpg"), b"x").unwrap();

        let options = WalkOptions {
            recursive: false,
            ..WalkOptions::default()
        };
        let result = MediaWalker::new(options).walk(base).unwrap();
        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn test_walk_missing_directory() {
        let result = MediaWalker::new(WalkOptions::default()).walk(Path::new("/no/such/dir"));
        assert!(matches!(result, Err(AppError::InvalidPath(_))));
    }
}
