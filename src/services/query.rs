//! 查询条件构建
//!
//! 把 [`FilterConfiguration`] 翻译成 WHERE 子句与绑定参数，不执行任何查询。
//! 相同输入总是得到相同输出。

use crate::models::index::{columns, MEDIA_TYPE_IMAGE, MEDIA_TYPE_VIDEO};
use crate::models::{FilterConfiguration, IndexQuery, MediaKind, Projection, ALL_BUCKET_ID};

/// 排除 GIF
pub const SQL_NOT_GIF: &str = " AND (mime_type!='image/gif')";
/// 排除 WEBP
pub const SQL_NOT_WEBP: &str = " AND (mime_type!='image/webp')";
/// 排除 BMP
pub const SQL_NOT_BMP: &str = " AND (mime_type!='image/bmp')";
/// 排除 x-ms-bmp
pub const SQL_NOT_X_MS_BMP: &str = " AND (mime_type!='image/x-ms-bmp')";
/// 排除 vnd.wap.wbmp
pub const SQL_NOT_WAP_BMP: &str = " AND (mime_type!='image/vnd.wap.wbmp')";
/// 排除 HEIC
pub const SQL_NOT_HEIC: &str = " AND (mime_type!='image/heic')";

/// WHERE 子句及其绑定参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCondition {
    pub selection: String,
    pub selection_args: Vec<String>,
}

/// 构建查询条件
///
/// `bucket_id` 为 `None` 或 [`ALL_BUCKET_ID`] 时不限制 bucket。
pub fn build_condition(config: &FilterConfiguration, bucket_id: Option<i64>) -> QueryCondition {
    let scoped = bucket_id.filter(|id| *id != ALL_BUCKET_ID);
    let bucket_clause = if scoped.is_some() {
        format!("{}=? AND ", columns::BUCKET_ID)
    } else {
        String::new()
    };
    let size = size_condition(config);
    let media_type = columns::MEDIA_TYPE;

    let (selection, mut selection_args) = match config.media_kind() {
        MediaKind::All => (
            format!(
                "({mt}=?{img} OR {mt}=? AND {dur}) AND {bucket}{size}",
                mt = media_type,
                img = image_exclusions(config),
                dur = duration_condition(config),
                bucket = bucket_clause,
                size = size,
            ),
            vec![MEDIA_TYPE_IMAGE.to_string(), MEDIA_TYPE_VIDEO.to_string()],
        ),
        MediaKind::Image => (
            format!(
                "{mt}=?{img} AND {bucket}{size}",
                mt = media_type,
                img = image_exclusions(config),
                bucket = bucket_clause,
                size = size,
            ),
            vec![MEDIA_TYPE_IMAGE.to_string()],
        ),
        MediaKind::Video => (
            format!(
                "{mt}=? AND {dur} AND {bucket}{size}",
                mt = media_type,
                dur = duration_condition(config),
                bucket = bucket_clause,
                size = size,
            ),
            vec![MEDIA_TYPE_VIDEO.to_string()],
        ),
    };

    if let Some(id) = scoped {
        selection_args.push(id.to_string());
    }

    QueryCondition {
        selection,
        selection_args,
    }
}

/// 构建完整查询
pub fn build_query(
    config: &FilterConfiguration,
    projection: Projection,
    bucket_id: Option<i64>,
) -> IndexQuery {
    let condition = build_condition(config, bucket_id);
    IndexQuery {
        projection,
        selection: condition.selection,
        selection_args: condition.selection_args,
        sort_order: sort_clause(config),
    }
}

/// 排序子句
pub fn sort_clause(config: &FilterConfiguration) -> String {
    format!("{} {}", columns::DATE_MODIFIED, config.sort_order().as_sql())
}

/// 未允许的图片格式逐个生成排除条件
pub fn image_exclusions(config: &FilterConfiguration) -> String {
    let mut sql = String::new();
    if !config.allow_gif() {
        sql.push_str(SQL_NOT_GIF);
    }
    if !config.allow_webp() {
        sql.push_str(SQL_NOT_WEBP);
    }
    if !config.allow_bmp() {
        sql.push_str(SQL_NOT_BMP);
    }
    if !config.allow_bmp_variant_a() {
        sql.push_str(SQL_NOT_X_MS_BMP);
    }
    if !config.allow_bmp_variant_b() {
        sql.push_str(SQL_NOT_WAP_BMP);
    }
    if !config.allow_heic() {
        sql.push_str(SQL_NOT_HEIC);
    }
    sql
}

/// 文件大小条件
pub fn size_condition(config: &FilterConfiguration) -> String {
    range_condition(columns::SIZE, config.file_size_min(), config.file_size_max())
}

/// 视频时长条件
pub fn duration_condition(config: &FilterConfiguration) -> String {
    range_condition(columns::DURATION, config.duration_min(), config.duration_max())
}

fn range_condition(column: &str, min: u64, max: u64) -> String {
    let lower = i64::try_from(min).unwrap_or(i64::MAX);
    let upper = if max == 0 {
        i64::MAX
    } else {
        i64::try_from(max).unwrap_or(i64::MAX)
    };
    format!("{} <= {} and {} <= {}", lower, column, column, upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortOrder;

    const ALL_EXCLUSIONS: &str = " AND (mime_type!='image/gif') AND (mime_type!='image/webp') \
AND (mime_type!='image/bmp') AND (mime_type!='image/x-ms-bmp') \
AND (mime_type!='image/vnd.wap.wbmp') AND (mime_type!='image/heic')";

    #[test]
    fn test_image_condition_with_defaults() {
        let config = FilterConfiguration::builder().media_kind(MediaKind::Image).build();
        let condition = build_condition(&config, None);
        assert_eq!(
            condition.selection,
            format!(
                "media_type=?{} AND 0 <= _size and _size <= {}",
                ALL_EXCLUSIONS,
                i64::MAX
            )
        );
        assert_eq!(condition.selection_args, vec!["1"]);
    }

    #[test]
    fn test_all_condition_scoped_to_bucket() {
        let config = FilterConfiguration::builder()
            .allow_gif(true)
            .allow_webp(true)
            .allow_bmp(true)
            .allow_bmp_variant_a(true)
            .allow_bmp_variant_b(true)
            .allow_heic(true)
            .duration_min(1000)
            .unwrap()
            .duration_max(60_000)
            .unwrap()
            .file_min_size(2048)
            .unwrap()
            .file_max_size(4096)
            .unwrap()
            .build();
        let condition = build_condition(&config, Some(42));
        assert_eq!(
            condition.selection,
            "(media_type=? OR media_type=? AND 1000 <= duration and duration <= 60000) \
AND bucket_id=? AND 2048 <= _size and _size <= 4096"
        );
        assert_eq!(condition.selection_args, vec!["1", "3", "42"]);
    }

    #[test]
    fn test_video_condition_has_duration_and_no_image_exclusions() {
        let config = FilterConfiguration::builder()
            .media_kind(MediaKind::Video)
            .duration_min(5000)
            .unwrap()
            .build();
        let condition = build_condition(&config, Some(9));
        assert_eq!(
            condition.selection,
            format!(
                "media_type=? AND 5000 <= duration and duration <= {max} AND bucket_id=? \
AND 0 <= _size and _size <= {max}",
                max = i64::MAX
            )
        );
        assert!(!condition.selection.contains("mime_type"));
        assert_eq!(condition.selection_args, vec!["3", "9"]);
    }

    #[test]
    fn test_all_bucket_sentinel_adds_no_clause() {
        let config = FilterConfiguration::default();
        let unscoped = build_condition(&config, None);
        let sentinel = build_condition(&config, Some(ALL_BUCKET_ID));
        assert_eq!(unscoped, sentinel);
        assert!(!sentinel.selection.contains("bucket_id"));
        assert_eq!(sentinel.selection_args, vec!["1", "3"]);
    }

    #[test]
    fn test_allowed_formats_contribute_no_clause() {
        let config = FilterConfiguration::builder().allow_gif(true).allow_heic(true).build();
        let sql = image_exclusions(&config);
        assert!(!sql.contains("image/gif"));
        assert!(!sql.contains("image/heic"));
        assert!(sql.contains("image/webp"));
        assert!(sql.contains("image/bmp"));
    }

    #[test]
    fn test_condition_is_deterministic() {
        let config = FilterConfiguration::builder()
            .media_kind(MediaKind::All)
            .file_max_size(1024 * 1024)
            .unwrap()
            .build();
        let first = build_query(&config, Projection::Records, Some(3));
        let second = build_query(&config, Projection::Records, Some(3));
        assert_eq!(first, second);
    }

    #[test]
    fn test_sort_clause() {
        let desc = FilterConfiguration::default();
        let asc = FilterConfiguration::builder().sort_order(SortOrder::Asc).build();
        assert_eq!(sort_clause(&desc), "date_modified DESC");
        assert_eq!(sort_clause(&asc), "date_modified ASC");
    }
}
