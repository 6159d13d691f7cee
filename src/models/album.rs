//! 相册数据模型

use serde::{Deserialize, Serialize};

use super::MediaRecord;

/// “全部媒体”合成相册使用的保留 bucket ID
pub const ALL_BUCKET_ID: i64 = -1;

/// 相册（对应一个 bucket，或合成的“全部媒体”相册）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumGroup {
    /// bucket ID
    pub bucket_id: i64,
    /// 相册名称
    pub folder_name: String,
    /// 封面路径
    pub cover_path: String,
    /// 封面 MIME 类型
    pub cover_mime_type: String,
    /// 媒体数量（轻量扫描时以此为准）
    pub total: usize,
    /// 媒体列表（轻量扫描后为空，首次选中时再加载）
    pub media_list: Vec<MediaRecord>,
    /// 是否选中（由 UI 维护）
    #[serde(default)]
    pub is_checked: bool,
}

impl Default for AlbumGroup {
    fn default() -> Self {
        Self {
            bucket_id: ALL_BUCKET_ID,
            folder_name: String::new(),
            cover_path: String::new(),
            cover_mime_type: String::new(),
            total: 0,
            media_list: Vec::new(),
            is_checked: false,
        }
    }
}

impl AlbumGroup {
    /// 创建空相册
    pub fn new(bucket_id: i64, folder_name: impl Into<String>) -> Self {
        Self {
            bucket_id,
            folder_name: folder_name.into(),
            ..Self::default()
        }
    }

    /// 由首个媒体文件创建相册（封面取该文件）
    pub fn from_record(record: &MediaRecord) -> Self {
        Self {
            bucket_id: record.bucket_id,
            folder_name: record.folder_name.clone(),
            cover_path: record.path.clone(),
            cover_mime_type: record.mime_type.clone(),
            ..Self::default()
        }
    }

    /// 是否为合成的“全部媒体”相册
    pub fn is_all_media(&self) -> bool {
        self.bucket_id == ALL_BUCKET_ID
    }

    /// 媒体列表尚未加载
    pub fn needs_population(&self) -> bool {
        self.media_list.is_empty()
    }

    /// 追加媒体文件并累加数量
    pub fn push(&mut self, record: MediaRecord) {
        self.media_list.push(record);
        self.total += 1;
    }
}

/// 按数量降序排序（稳定排序，数量相同保持原顺序）
pub fn sort_by_total_desc(groups: &mut [AlbumGroup]) {
    groups.sort_by(|a, b| b.total.cmp(&a.total));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_default_is_all_media() {
        let album = AlbumGroup::default();
        assert!(album.is_all_media());
        assert!(album.needs_population());
        assert_eq!(album.total, 0);
    }

    #[test]
    fn test_sort_by_total_is_stable() {
        let mut groups = vec![
            AlbumGroup { total: 1, ..AlbumGroup::new(1, "a") },
            AlbumGroup { total: 5, ..AlbumGroup::new(2, "b") },
            AlbumGroup { total: 1, ..AlbumGroup::new(3, "c") },
        ];
        sort_by_total_desc(&mut groups);
        let ids: Vec<i64> = groups.iter().map(|g| g.bucket_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_album_serialization_camel_case() {
        let album = AlbumGroup::new(7, "Camera");
        let json = serde_json::to_string(&album).unwrap();
        assert!(json.contains("\"bucketId\":7"));
        assert!(json.contains("\"mediaList\":[]"));
    }
}
