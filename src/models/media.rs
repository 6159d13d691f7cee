//! 媒体文件数据模型

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::utils::mime;

/// 由 MIME 前缀推导出的粗粒度媒体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    #[default]
    Other,
}

impl MediaType {
    pub fn from_mime(mime_type: &str) -> Self {
        if mime::is_image(mime_type) {
            MediaType::Image
        } else if mime::is_video(mime_type) {
            MediaType::Video
        } else {
            MediaType::Other
        }
    }
}

/// 一个符合过滤条件的媒体文件
///
/// 相等性与哈希只由 `path` 决定：路径相同即视为同一文件，其他字段不参与比较。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    /// 媒体 ID
    pub id: i64,
    /// 所属相册 ID
    pub bucket_id: i64,
    /// 访问路径（新平台为间接引用，旧平台为绝对路径）
    pub path: String,
    /// 所属相册名称
    pub folder_name: String,
    /// 文件名
    pub file_name: String,
    /// MIME 类型
    pub mime_type: String,
    /// 添加时间
    pub create_date: i64,
    /// 文件大小（字节）
    pub size: i64,
    /// 宽度（已按方向校正）
    pub width: i64,
    /// 高度（已按方向校正）
    pub height: i64,
    /// 时长（非视频为 0）
    pub duration: i64,
    /// 媒体类型
    pub media_type: MediaType,
    /// 是否选中（由 UI 维护）
    #[serde(default)]
    pub is_checked: bool,
}

impl MediaRecord {
    /// 按添加时间降序比较（越新越靠前）
    pub fn cmp_by_recency(&self, other: &Self) -> Ordering {
        other.create_date.cmp(&self.create_date)
    }

    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }
}

impl PartialEq for MediaRecord {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for MediaRecord {}

impl Hash for MediaRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

/// 按添加时间降序排序（稳定排序）
pub fn sort_by_recency(records: &mut [MediaRecord]) {
    records.sort_by(MediaRecord::cmp_by_recency);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn record(path: &str, create_date: i64) -> MediaRecord {
        MediaRecord {
            id: 1,
            bucket_id: 10,
            path: path.to_string(),
            folder_name: "Camera".to_string(),
            file_name: "a.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            create_date,
            size: 4096,
            width: 100,
            height: 200,
            duration: 0,
            media_type: MediaType::Image,
            is_checked: false,
        }
    }

    fn hash_of(record: &MediaRecord) -> u64 {
        let mut hasher = DefaultHasher::new();
        record.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_identity_is_path_only() {
        let a = record("/sdcard/DCIM/a.jpg", 1);
        let mut b = record("/sdcard/DCIM/a.jpg", 2);
        b.size = 999_999;
        b.width = 1;
        b.id = 42;

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let set: HashSet<MediaRecord> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_different_paths_are_different_records() {
        assert_ne!(record("/a.jpg", 1), record("/b.jpg", 1));
    }

    #[test]
    fn test_sort_by_recency_descending() {
        let mut records = vec![record("/1", 100), record("/2", 300), record("/3", 200)];
        sort_by_recency(&mut records);
        let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/2", "/3", "/1"]);
    }

    #[test]
    fn test_media_type_from_mime() {
        assert_eq!(MediaType::from_mime("image/png"), MediaType::Image);
        assert_eq!(MediaType::from_mime("video/mp4"), MediaType::Video);
        assert_eq!(MediaType::from_mime("audio/mpeg"), MediaType::Other);
    }
}
