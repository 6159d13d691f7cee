//! 媒体行解析
//!
//! 把媒体索引返回的一行数据转换为 [`MediaRecord`]，同时执行逐条过滤。
//! 被过滤的行不会产生任何错误，只在 trace 日志中留下原因。

use std::fmt;

use crate::models::{
    AlbumLabels, FilterConfiguration, MediaRecord, MediaRow, MediaType, Platform,
};
use crate::services::gateway::MediaIndex;
use crate::utils::mime;

/// 小于 1KB 的非空文件视为损坏或占位文件
pub const MIN_VALID_SIZE: i64 = 1024;

/// 行被过滤的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// MIME 类型为通配值且无法从扩展名推断
    UnresolvedMime,
    Gif,
    Webp,
    Bmp,
    Heic,
    /// 文件过小
    TooSmall,
    /// 视频短于最小时长
    TooShort,
    /// 视频长于最大时长
    TooLong,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::UnresolvedMime => "无法确定 MIME 类型",
            RejectReason::Gif => "不允许 GIF",
            RejectReason::Webp => "不允许 WEBP",
            RejectReason::Bmp => "不允许 BMP",
            RejectReason::Heic => "不允许 HEIC",
            RejectReason::TooSmall => "文件小于 1KB",
            RejectReason::TooShort => "视频时长过短",
            RejectReason::TooLong => "视频时长过长",
        };
        f.write_str(text)
    }
}

/// 媒体行解析器
pub struct RecordParser<'a> {
    config: &'a FilterConfiguration,
    platform: Platform,
    labels: &'a AlbumLabels,
    index: &'a dyn MediaIndex,
}

impl<'a> RecordParser<'a> {
    pub fn new(
        config: &'a FilterConfiguration,
        platform: Platform,
        labels: &'a AlbumLabels,
        index: &'a dyn MediaIndex,
    ) -> Self {
        Self {
            config,
            platform,
            labels,
            index,
        }
    }

    /// 解析一行，被过滤时返回 `None`
    pub fn parse(&self, row: &MediaRow) -> Option<MediaRecord> {
        match self.try_parse(row) {
            Ok(record) => Some(record),
            Err(reason) => {
                tracing::trace!(id = row.id, path = row.absolute_path(), "跳过媒体文件: {}", reason);
                None
            }
        }
    }

    /// 解析一行，被过滤时返回原因
    pub fn try_parse(&self, row: &MediaRow) -> Result<MediaRecord, RejectReason> {
        let absolute_path = row.absolute_path();
        let raw_mime = row.raw_mime_type();

        let path = if self.platform.uses_indirect_reference() {
            self.index
                .content_reference(row.id, MediaType::from_mime(raw_mime))
        } else {
            absolute_path.to_string()
        };

        let mut mime_type = if raw_mime.is_empty() {
            mime::MIME_TYPE_JPEG.to_string()
        } else {
            raw_mime.to_string()
        };

        // 部分机型返回 image/*，需要根据扩展名重新推断
        if mime_type.ends_with(mime::MIME_TYPE_IMAGE_ANY) {
            mime_type = mime::mime_from_path(absolute_path).ok_or(RejectReason::UnresolvedMime)?;
        }

        self.check_format(&mime_type)?;

        if (1..MIN_VALID_SIZE).contains(&row.size) {
            return Err(RejectReason::TooSmall);
        }

        let media_type = MediaType::from_mime(&mime_type);
        if media_type == MediaType::Video {
            self.check_duration(row.duration)?;
        }

        let (width, height) = if row.orientation == 90 || row.orientation == 270 {
            (row.height, row.width)
        } else {
            (row.width, row.height)
        };

        let file_name = match row.display_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => mime::extract_file_name(absolute_path),
        };

        let folder_name = match row.bucket_display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => self.labels.untitled.clone(),
        };

        Ok(MediaRecord {
            id: row.id,
            bucket_id: row.bucket_id,
            path,
            folder_name,
            file_name,
            mime_type,
            create_date: row.date_added,
            size: row.size,
            width,
            height,
            duration: if media_type == MediaType::Video { row.duration } else { 0 },
            media_type,
            is_checked: false,
        })
    }

    fn check_format(&self, mime_type: &str) -> Result<(), RejectReason> {
        let config = self.config;
        if !config.allow_gif() && mime::is_gif(mime_type) {
            return Err(RejectReason::Gif);
        }
        if !config.allow_webp() && mime::is_webp(mime_type) {
            return Err(RejectReason::Webp);
        }
        if mime::is_bmp_family(mime_type) {
            let variant_blocked = (mime::is_x_ms_bmp(mime_type) && !config.allow_bmp_variant_a())
                || (mime::is_wap_bmp(mime_type) && !config.allow_bmp_variant_b());
            if !config.allow_bmp() || variant_blocked {
                return Err(RejectReason::Bmp);
            }
        }
        if !config.allow_heic() && mime::is_heic(mime_type) {
            return Err(RejectReason::Heic);
        }
        Ok(())
    }

    fn check_duration(&self, duration: i64) -> Result<(), RejectReason> {
        let min = i64::try_from(self.config.duration_min()).unwrap_or(i64::MAX);
        let max = i64::try_from(self.config.duration_max()).unwrap_or(i64::MAX);
        if min > 0 && duration < min {
            return Err(RejectReason::TooShort);
        }
        if max > 0 && duration > max {
            return Err(RejectReason::TooLong);
        }
        Ok(())
    }
}
