//! 索引服务
//!
//! 遍历目录并把媒体文件写入 SQLite 媒体索引，为桌面端提供与移动端一致的数据源

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rayon::prelude::*;
use xxhash_rust::xxh3::xxh3_64;

use crate::db::{Database, NewMediaEntry};
use crate::models::index::{MEDIA_TYPE_IMAGE, MEDIA_TYPE_VIDEO};
use crate::models::MediaType;
use crate::utils::error::AppResult;
use crate::utils::mime::mime_from_path;

use super::walker::{MediaWalker, WalkOptions};

/// 索引结果
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexResult {
    /// 写入的文件数
    pub indexed: usize,
    /// 跳过的文件数（已在索引中，或无法识别 MIME 类型）
    pub skipped: usize,
    /// 失败的文件数
    pub failed: usize,
    /// 从索引中移除的文件数（磁盘上已不存在）
    pub removed: usize,
    /// 失败的文件列表
    pub failed_files: Vec<String>,
}

/// 索引选项
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexOptions {
    /// 遍历选项
    pub walk_options: WalkOptions,
    /// 是否跳过已存在的文件（基于路径）
    pub skip_existing: bool,
    /// 是否移除磁盘上已不存在的记录
    pub prune_missing: bool,
    /// 批量写入大小
    pub batch_size: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            walk_options: WalkOptions::default(),
            skip_existing: false,
            prune_missing: true,
            batch_size: 100,
        }
    }
}

/// 媒体索引器
pub struct MediaIndexer {
    db: Arc<Database>,
    options: IndexOptions,
}

impl MediaIndexer {
    /// 创建新的索引器
    pub fn new(db: Arc<Database>, options: IndexOptions) -> Self {
        Self { db, options }
    }

    /// 索引单个目录
    pub fn index_directory(&self, path: &Path) -> AppResult<IndexResult> {
        tracing::info!("开始索引目录: {}", path.display());
        let walker = MediaWalker::new(self.options.walk_options.clone());
        let walked = walker.walk(path)?;

        let mut result = self.index_files(&walked.files)?;
        if self.options.prune_missing {
            result.removed = self.prune(path, &walked.files)?;
        }

        tracing::info!(
            "索引完成: {} 写入, {} 跳过, {} 失败, {} 移除",
            result.indexed,
            result.skipped,
            result.failed,
            result.removed
        );
        Ok(result)
    }

    fn index_files(&self, files: &[PathBuf]) -> AppResult<IndexResult> {
        let skipped = AtomicUsize::new(0);
        let failed_files = std::sync::Mutex::new(Vec::new());

        let entries: Vec<NewMediaEntry> = files
            .par_iter()
            .filter_map(|file_path| match self.process_single_file(file_path) {
                Ok(Some(entry)) => Some(entry),
                Ok(None) => {
                    skipped.fetch_add(1, Ordering::SeqCst);
                    None
                }
                Err(e) => {
                    tracing::warn!("处理文件失败 {}: {}", file_path.display(), e);
                    if let Ok(mut failed) = failed_files.lock() {
                        failed.push(format!("{}: {}", file_path.display(), e));
                    }
                    None
                }
            })
            .collect();

        let mut indexed = 0;
        for chunk in entries.chunks(self.options.batch_size.max(1)) {
            indexed += self.db.upsert_media_batch(chunk)?;
        }

        let failed_files = failed_files.into_inner().unwrap_or_default();
        Ok(IndexResult {
            indexed,
            skipped: skipped.load(Ordering::SeqCst),
            failed: failed_files.len(),
            removed: 0,
            failed_files,
        })
    }

    fn prune(&self, root: &Path, files: &[PathBuf]) -> AppResult<usize> {
        let mut prefix = root.to_string_lossy().to_string();
        if !prefix.ends_with(std::path::MAIN_SEPARATOR) {
            prefix.push(std::path::MAIN_SEPARATOR);
        }
        let keep: Vec<String> = files
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();
        self.db.prune_missing(&prefix, &keep)
    }

    /// 处理单个文件，返回 `None` 表示跳过
    fn process_single_file(&self, path: &Path) -> AppResult<Option<NewMediaEntry>> {
        let path_str = path.to_string_lossy().to_string();

        if self.options.skip_existing && self.db.get_media_by_path(&path_str)?.is_some() {
            return Ok(None);
        }

        let Some(mime_type) = mime_from_path(&path_str) else {
            return Ok(None);
        };

        let metadata = std::fs::metadata(path)?;
        let media_type = MediaType::from_mime(&mime_type);

        let (width, height) = match media_type {
            MediaType::Image => match image::image_dimensions(path) {
                Ok((w, h)) => (i64::from(w), i64::from(h)),
                Err(e) => {
                    tracing::debug!("无法读取图片尺寸 {}: {}", path.display(), e);
                    (0, 0)
                }
            },
            _ => (0, 0),
        };

        let date_modified = metadata.modified().map(unix_seconds).unwrap_or(0);
        let date_added = metadata.created().map(unix_seconds).unwrap_or(date_modified);

        let parent = path.parent().unwrap_or_else(|| Path::new(""));

        Ok(Some(NewMediaEntry {
            path: path_str,
            display_name: path.file_name().map(|n| n.to_string_lossy().to_string()),
            width,
            height,
            size: metadata.len() as i64,
            duration: 0,
            mime_type: Some(mime_type),
            date_added,
            date_modified,
            orientation: 0,
            bucket_id: bucket_id_for(parent),
            bucket_display_name: parent.file_name().map(|n| n.to_string_lossy().to_string()),
            media_type: match media_type {
                MediaType::Video => MEDIA_TYPE_VIDEO,
                _ => MEDIA_TYPE_IMAGE,
            },
        }))
    }
}

/// 由目录路径计算稳定的 bucket ID
///
/// 结果非负，不会与 [`ALL_BUCKET_ID`](crate::models::ALL_BUCKET_ID) 冲突。
pub fn bucket_id_for(dir: &Path) -> i64 {
    let hash = xxh3_64(dir.to_string_lossy().as_bytes());
    (hash & i64::MAX as u64) as i64
}

fn unix_seconds(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    use crate::models::{PickerSettings, Platform};
    use crate::services::grouping::{AlbumGrouping, FullScanGrouping};

    fn setup_db() -> Arc<Database> {
        let db = Database::open_in_memory().unwrap();
        db.init().unwrap();
        Arc::new(db)
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbImage::new(width, height).save(path).unwrap();
    }

    #[test]
    fn test_bucket_id_is_stable_and_non_negative() {
        let a = bucket_id_for(Path::new("/storage/DCIM/Camera"));
        let b = bucket_id_for(Path::new("/storage/DCIM/Camera"));
        let c = bucket_id_for(Path::new("/storage/Pictures"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a >= 0 && c >= 0);
    }

    #[test]
    fn test_index_directory() {
        let temp_dir = TempDir::new().unwrap();
        let camera = temp_dir.path().join("Camera");
        fs::create_dir(&camera).unwrap();
        write_png(&camera.join("shot.png"), 4, 3);
        fs::write(camera.join("clip.mp4"), vec![0u8; 2048]).unwrap();
        fs::write(camera.join("readme.txt"), b"text").unwrap();

        let db = setup_db();
        let indexer = MediaIndexer::new(db.clone(), IndexOptions::default());
        let result = indexer.index_directory(temp_dir.path()).unwrap();
        assert_eq!(result.indexed, 2);
        assert_eq!(result.failed, 0);

        let png = db
            .get_media_by_path(&camera.join("shot.png").to_string_lossy())
            .unwrap()
            .unwrap();
        assert_eq!((png.width, png.height), (4, 3));
        assert_eq!(png.mime_type.as_deref(), Some("image/png"));
        assert_eq!(png.bucket_display_name.as_deref(), Some("Camera"));
        assert_eq!(png.bucket_id, bucket_id_for(&camera));

        let stats = db.stats().unwrap();
        assert_eq!(stats.image_count, 1);
        assert_eq!(stats.video_count, 1);
    }

    #[test]
    fn test_reindex_prunes_deleted_files() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.png");
        let second = temp_dir.path().join("b.png");
        write_png(&first, 2, 2);
        write_png(&second, 2, 2);

        let db = setup_db();
        let indexer = MediaIndexer::new(db.clone(), IndexOptions::default());
        indexer.index_directory(temp_dir.path()).unwrap();
        assert_eq!(db.count_media().unwrap(), 2);

        fs::remove_file(&second).unwrap();
        let result = indexer.index_directory(temp_dir.path()).unwrap();
        assert_eq!(result.removed, 1);
        assert_eq!(db.count_media().unwrap(), 1);
    }

    #[test]
    fn test_skip_existing() {
        let temp_dir = TempDir::new().unwrap();
        write_png(&temp_dir.path().join("a.png"), 2, 2);

        let db = setup_db();
        let options = IndexOptions {
            skip_existing: true,
            ..IndexOptions::default()
        };
        let indexer = MediaIndexer::new(db, options);
        assert_eq!(indexer.index_directory(temp_dir.path()).unwrap().indexed, 1);
        let again = indexer.index_directory(temp_dir.path()).unwrap();
        assert_eq!(again.indexed, 0);
        assert_eq!(again.skipped, 1);
        assert_eq!(again.removed, 0);
    }

    #[test]
    fn test_indexed_files_feed_album_scan() {
        let temp_dir = TempDir::new().unwrap();
        let album = temp_dir.path().join("Holiday");
        fs::create_dir(&album).unwrap();
        for i in 0..3 {
            fs::write(album.join(format!("{}.jpg", i)), vec![0u8; 4096]).unwrap();
        }

        let db = setup_db();
        MediaIndexer::new(db.clone(), IndexOptions::default())
            .index_directory(temp_dir.path())
            .unwrap();

        let settings = PickerSettings {
            lightweight_scan: false,
            platform: Platform::Legacy,
            ..PickerSettings::default()
        };
        let albums = FullScanGrouping.group(db.as_ref(), &settings).unwrap();
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[1].folder_name, "Holiday");
        assert_eq!(albums[1].total, 3);
    }
}
