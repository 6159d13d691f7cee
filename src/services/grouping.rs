//! 相册分组
//!
//! 两种扫描策略实现同一个 [`AlbumGrouping`] trait：
//! - [`FullScanGrouping`]: 读取并解析全部媒体，按相册名称分组
//! - [`LightweightGrouping`]: 只统计每个 bucket 的数量，媒体列表延迟加载

use std::collections::{HashMap, HashSet};

use crate::models::album::sort_by_total_desc;
use crate::models::{
    AlbumGroup, MediaRecord, MediaRow, MediaType, PickerSettings, Projection, ALL_BUCKET_ID,
};
use crate::services::gateway::MediaIndex;
use crate::services::parser::RecordParser;
use crate::services::query::build_query;
use crate::utils::error::AppResult;

/// 相册分组策略
pub trait AlbumGrouping: Send + Sync {
    /// 策略名称（用于日志）
    fn name(&self) -> &'static str;

    /// 扫描媒体索引并生成相册列表
    ///
    /// 非空结果的第一项总是“全部媒体”合成相册。
    fn group(&self, index: &dyn MediaIndex, settings: &PickerSettings)
        -> AppResult<Vec<AlbumGroup>>;
}

/// 根据设置选择分组策略
pub fn select_grouping(settings: &PickerSettings) -> Box<dyn AlbumGrouping> {
    let grouping: Box<dyn AlbumGrouping> = if settings.lightweight_scan {
        Box::new(LightweightGrouping)
    } else {
        Box::new(FullScanGrouping)
    };
    tracing::debug!("使用分组策略: {}", grouping.name());
    grouping
}

/// 查询单个 bucket 内的媒体文件
///
/// `bucket_id` 为 [`ALL_BUCKET_ID`] 时返回全部媒体。未知 bucket 返回空列表。
pub fn query_bucket(
    index: &dyn MediaIndex,
    settings: &PickerSettings,
    bucket_id: i64,
) -> AppResult<Vec<MediaRecord>> {
    let query = build_query(&settings.filter, Projection::Records, Some(bucket_id));
    tracing::debug!(bucket_id, selection = %query.selection, "查询 bucket");

    let rows = index.query(&query)?;
    let parser = parser_for(index, settings);
    Ok(rows.iter().filter_map(|row| parser.parse(row)).collect())
}

fn parser_for<'a>(index: &'a dyn MediaIndex, settings: &'a PickerSettings) -> RecordParser<'a> {
    RecordParser::new(&settings.filter, settings.platform, &settings.labels, index)
}

/// 全量扫描
#[derive(Debug, Default, Clone, Copy)]
pub struct FullScanGrouping;

impl AlbumGrouping for FullScanGrouping {
    fn name(&self) -> &'static str {
        "full"
    }

    fn group(
        &self,
        index: &dyn MediaIndex,
        settings: &PickerSettings,
    ) -> AppResult<Vec<AlbumGroup>> {
        let query = build_query(&settings.filter, Projection::Records, None);
        let rows = index.query(&query)?;

        let parser = parser_for(index, settings);
        let records: Vec<MediaRecord> = rows.iter().filter_map(|row| parser.parse(row)).collect();
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut groups: Vec<AlbumGroup> = Vec::new();
        for record in &records {
            // 名称为空的相册不参与合并
            let existing = groups
                .iter_mut()
                .find(|g| !g.folder_name.trim().is_empty() && g.folder_name == record.folder_name);
            match existing {
                Some(group) => {
                    // 同名相册跨多个 bucket 时以最后加入的文件为准
                    group.bucket_id = record.bucket_id;
                    group.push(record.clone());
                }
                None => {
                    let mut group = AlbumGroup::from_record(record);
                    group.push(record.clone());
                    groups.push(group);
                }
            }
        }
        sort_by_total_desc(&mut groups);

        let first = &records[0];
        let all_media = AlbumGroup {
            bucket_id: ALL_BUCKET_ID,
            folder_name: settings.labels.all_media.clone(),
            cover_path: first.path.clone(),
            cover_mime_type: first.mime_type.clone(),
            total: records.len(),
            media_list: records,
            is_checked: false,
        };

        let mut albums = Vec::with_capacity(groups.len() + 1);
        albums.push(all_media);
        albums.extend(groups);
        albums.retain(|album| !album.media_list.is_empty());
        Ok(albums)
    }
}

/// 轻量扫描
#[derive(Debug, Default, Clone, Copy)]
pub struct LightweightGrouping;

impl LightweightGrouping {
    fn cover_path(index: &dyn MediaIndex, settings: &PickerSettings, row: &MediaRow) -> String {
        if settings.platform.uses_indirect_reference() {
            index.content_reference(row.id, MediaType::from_mime(row.raw_mime_type()))
        } else {
            row.absolute_path().to_string()
        }
    }

    fn album_for(index: &dyn MediaIndex, settings: &PickerSettings, row: &MediaRow) -> AlbumGroup {
        AlbumGroup {
            bucket_id: row.bucket_id,
            folder_name: row.bucket_display_name.clone().unwrap_or_default(),
            cover_path: Self::cover_path(index, settings, row),
            cover_mime_type: row.raw_mime_type().to_string(),
            ..AlbumGroup::default()
        }
    }

    /// 逐行统计（索引不支持聚合查询）
    fn count_rows(
        index: &dyn MediaIndex,
        settings: &PickerSettings,
        rows: &[MediaRow],
    ) -> Vec<AlbumGroup> {
        let mut counts: HashMap<i64, usize> = HashMap::new();
        let mut materialized: HashSet<i64> = HashSet::new();
        let mut groups = Vec::new();

        for row in rows {
            *counts.entry(row.bucket_id).or_insert(0) += 1;
            if materialized.insert(row.bucket_id) {
                groups.push(Self::album_for(index, settings, row));
            }
        }

        for group in &mut groups {
            group.total = counts.get(&group.bucket_id).copied().unwrap_or(0);
        }
        groups
    }

    /// 每行已是一个 bucket 的聚合结果
    fn aggregate_rows(
        index: &dyn MediaIndex,
        settings: &PickerSettings,
        rows: &[MediaRow],
    ) -> Vec<AlbumGroup> {
        rows.iter()
            .map(|row| AlbumGroup {
                total: usize::try_from(row.count.unwrap_or(0)).unwrap_or(0),
                ..Self::album_for(index, settings, row)
            })
            .collect()
    }
}

impl AlbumGrouping for LightweightGrouping {
    fn name(&self) -> &'static str {
        "lightweight"
    }

    fn group(
        &self,
        index: &dyn MediaIndex,
        settings: &PickerSettings,
    ) -> AppResult<Vec<AlbumGroup>> {
        let projection = if settings.platform.uses_indirect_reference() {
            Projection::Records
        } else {
            Projection::BucketCounts
        };
        let query = build_query(&settings.filter, projection, None);
        let rows = index.query(&query)?;

        let mut groups = match projection {
            Projection::Records => Self::count_rows(index, settings, &rows),
            Projection::BucketCounts => Self::aggregate_rows(index, settings, &rows),
        };
        sort_by_total_desc(&mut groups);

        let grand_total: usize = groups.iter().map(|g| g.total).sum();
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };
        if grand_total == 0 {
            return Ok(Vec::new());
        }

        let all_media = AlbumGroup {
            bucket_id: ALL_BUCKET_ID,
            folder_name: settings.labels.all_media.clone(),
            cover_path: Self::cover_path(index, settings, first),
            cover_mime_type: first.raw_mime_type().to_string(),
            total: grand_total,
            ..AlbumGroup::default()
        };

        let mut albums = Vec::with_capacity(groups.len() + 1);
        albums.push(all_media);
        albums.extend(groups);
        Ok(albums)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Platform;
    use crate::services::testing::{bucket_row, image_row, StubIndex};

    fn settings(lightweight: bool, platform: Platform) -> PickerSettings {
        PickerSettings {
            lightweight_scan: lightweight,
            platform,
            ..PickerSettings::default()
        }
    }

    fn sample_rows() -> Vec<MediaRow> {
        vec![
            image_row(1, 10, "Camera", 500),
            image_row(2, 20, "Screenshots", 400),
            image_row(3, 10, "Camera", 300),
            image_row(4, 30, "WeChat", 200),
            image_row(5, 10, "Camera", 100),
            image_row(6, 20, "Screenshots", 50),
        ]
    }

    #[test]
    fn test_select_grouping() {
        assert_eq!(select_grouping(&settings(true, Platform::Modern)).name(), "lightweight");
        assert_eq!(select_grouping(&settings(false, Platform::Modern)).name(), "full");
    }

    #[test]
    fn test_full_scan_groups_by_folder_name() {
        let index = StubIndex::with_records(sample_rows());
        let albums = FullScanGrouping
            .group(&index, &settings(false, Platform::Legacy))
            .unwrap();

        let summary: Vec<(i64, &str, usize)> = albums
            .iter()
            .map(|a| (a.bucket_id, a.folder_name.as_str(), a.total))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ALL_BUCKET_ID, "最近相册", 6),
                (10, "Camera", 3),
                (20, "Screenshots", 2),
                (30, "WeChat", 1),
            ]
        );
        assert_eq!(albums[0].cover_path, "/storage/Camera/IMG_1.jpg");
        assert_eq!(albums[0].media_list.len(), 6);
        assert_eq!(albums[1].cover_path, "/storage/Camera/IMG_1.jpg");
        for album in &albums {
            assert_eq!(album.total, album.media_list.len());
        }
    }

    #[test]
    fn test_full_scan_is_idempotent() {
        let index = StubIndex::with_records(sample_rows());
        let settings = settings(false, Platform::Modern);
        let first = FullScanGrouping.group(&index, &settings).unwrap();
        let second = FullScanGrouping.group(&index, &settings).unwrap();

        let flatten = |albums: &[AlbumGroup]| -> Vec<(i64, String, usize, Vec<String>)> {
            albums
                .iter()
                .map(|a| {
                    (
                        a.bucket_id,
                        a.folder_name.clone(),
                        a.total,
                        a.media_list.iter().map(|r| r.path.clone()).collect(),
                    )
                })
                .collect()
        };
        assert_eq!(flatten(&first), flatten(&second));
    }

    #[test]
    fn test_full_scan_without_records_is_empty() {
        let mut rows = sample_rows();
        for row in &mut rows {
            row.size = 10;
        }
        let index = StubIndex::with_records(rows);
        let albums = FullScanGrouping
            .group(&index, &settings(false, Platform::Legacy))
            .unwrap();
        assert!(albums.is_empty());
    }

    #[test]
    fn test_full_scan_blank_folder_names_never_merge() {
        let mut settings = settings(false, Platform::Legacy);
        settings.labels.untitled = String::new();

        let mut rows = vec![image_row(1, 10, "x", 2), image_row(2, 11, "y", 1)];
        for row in &mut rows {
            row.bucket_display_name = None;
        }
        let index = StubIndex::with_records(rows);
        let albums = FullScanGrouping.group(&index, &settings).unwrap();

        assert_eq!(albums.len(), 3);
        assert_eq!(albums[1].total, 1);
        assert_eq!(albums[2].total, 1);
    }

    #[test]
    fn test_full_scan_same_name_takes_last_bucket_id() {
        let index = StubIndex::with_records(vec![
            image_row(1, 10, "Camera", 200),
            image_row(2, 77, "Camera", 100),
        ]);
        let albums = FullScanGrouping
            .group(&index, &settings(false, Platform::Legacy))
            .unwrap();

        assert_eq!(albums.len(), 2);
        assert_eq!(albums[1].folder_name, "Camera");
        assert_eq!(albums[1].bucket_id, 77);
        assert_eq!(albums[1].total, 2);
        assert_eq!(albums[1].cover_path, "/storage/Camera/IMG_1.jpg");
    }

    #[test]
    fn test_lightweight_legacy_uses_aggregate_rows() {
        let index = StubIndex {
            buckets: vec![
                bucket_row(1, 100, "B", 5),
                bucket_row(2, 200, "A", 10),
                bucket_row(3, 300, "C", 0),
            ],
            ..StubIndex::default()
        };
        let albums = LightweightGrouping
            .group(&index, &settings(true, Platform::Legacy))
            .unwrap();

        let summary: Vec<(&str, usize)> =
            albums.iter().map(|a| (a.folder_name.as_str(), a.total)).collect();
        assert_eq!(summary, vec![("最近相册", 15), ("A", 10), ("B", 5), ("C", 0)]);
        assert_eq!(albums[0].cover_path, "/storage/B/IMG_1.jpg");
        assert!(albums.iter().all(|a| a.media_list.is_empty()));

        let queries = index.queries.lock().unwrap();
        assert_eq!(queries[0].projection, Projection::BucketCounts);
    }

    #[test]
    fn test_lightweight_modern_counts_rows() {
        let index = StubIndex::with_records(sample_rows());
        let albums = LightweightGrouping
            .group(&index, &settings(true, Platform::Modern))
            .unwrap();

        let summary: Vec<(i64, usize)> = albums.iter().map(|a| (a.bucket_id, a.total)).collect();
        assert_eq!(summary, vec![(ALL_BUCKET_ID, 6), (10, 3), (20, 2), (30, 1)]);
        assert_eq!(albums[0].cover_path, "content://media/external/images/media/1");
        assert_eq!(albums[2].cover_path, "content://media/external/images/media/2");
        assert!(albums.iter().all(|a| a.needs_population()));
    }

    #[test]
    fn test_lightweight_keeps_blank_bucket_name() {
        let mut unnamed = bucket_row(2, 200, "ignored", 3);
        unnamed.bucket_display_name = None;
        let index = StubIndex {
            buckets: vec![bucket_row(1, 100, "A", 4), unnamed],
            ..StubIndex::default()
        };
        let albums = LightweightGrouping
            .group(&index, &settings(true, Platform::Legacy))
            .unwrap();

        let names: Vec<&str> = albums.iter().map(|a| a.folder_name.as_str()).collect();
        assert_eq!(names, vec!["最近相册", "A", ""]);
    }

    #[test]
    fn test_lightweight_zero_total_is_empty() {
        let index = StubIndex {
            buckets: vec![bucket_row(1, 100, "A", 0)],
            ..StubIndex::default()
        };
        let albums = LightweightGrouping
            .group(&index, &settings(true, Platform::Legacy))
            .unwrap();
        assert!(albums.is_empty());

        let empty = StubIndex::default();
        let albums = LightweightGrouping
            .group(&empty, &settings(true, Platform::Modern))
            .unwrap();
        assert!(albums.is_empty());
    }

    #[test]
    fn test_grouping_propagates_index_failure() {
        let index = StubIndex::failing();
        let settings = settings(false, Platform::Modern);
        assert!(FullScanGrouping.group(&index, &settings).is_err());
        assert!(LightweightGrouping.group(&index, &settings).is_err());
    }

    #[test]
    fn test_query_bucket() {
        let index = StubIndex::with_records(sample_rows());
        let settings = settings(true, Platform::Legacy);

        let camera = query_bucket(&index, &settings, 10).unwrap();
        let ids: Vec<i64> = camera.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);

        let all = query_bucket(&index, &settings, ALL_BUCKET_ID).unwrap();
        assert_eq!(all.len(), 6);

        let unknown = query_bucket(&index, &settings, 999).unwrap();
        assert!(unknown.is_empty());
    }
}
