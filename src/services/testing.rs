//! 测试用媒体索引

use std::sync::Mutex;

use crate::models::index::columns;
use crate::models::{IndexQuery, MediaRow, Projection};
use crate::services::gateway::MediaIndex;
use crate::utils::error::{AppError, AppResult};

/// 内存中的媒体索引替身
///
/// 记录查询返回 `records`（带 bucket 条件时按最后一个参数过滤），
/// 聚合查询返回 `buckets`。
#[derive(Default)]
pub struct StubIndex {
    pub records: Vec<MediaRow>,
    pub buckets: Vec<MediaRow>,
    pub fail: bool,
    pub queries: Mutex<Vec<IndexQuery>>,
}

impl StubIndex {
    pub fn with_records(records: Vec<MediaRow>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().map(|q| q.len()).unwrap_or(0)
    }
}

impl MediaIndex for StubIndex {
    fn query(&self, query: &IndexQuery) -> AppResult<Vec<MediaRow>> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        if self.fail {
            return Err(AppError::General("索引不可用".to_string()));
        }
        match query.projection {
            Projection::BucketCounts => Ok(self.buckets.clone()),
            Projection::Records => {
                let scoped = format!("{}=?", columns::BUCKET_ID);
                if !query.selection.contains(&scoped) {
                    return Ok(self.records.clone());
                }
                let bucket_id: i64 = query
                    .selection_args
                    .last()
                    .and_then(|arg| arg.parse().ok())
                    .unwrap_or_default();
                Ok(self
                    .records
                    .iter()
                    .filter(|row| row.bucket_id == bucket_id)
                    .cloned()
                    .collect())
            }
        }
    }
}

/// 构造一行图片数据
pub fn image_row(id: i64, bucket_id: i64, folder: &str, date_added: i64) -> MediaRow {
    MediaRow {
        id,
        data: Some(format!("/storage/{}/IMG_{}.jpg", folder, id)),
        width: 800,
        height: 600,
        size: 50_000,
        mime_type: Some("image/jpeg".to_string()),
        date_added,
        display_name: Some(format!("IMG_{}.jpg", id)),
        bucket_id,
        bucket_display_name: Some(folder.to_string()),
        date_modified: date_added,
        ..MediaRow::default()
    }
}

/// 构造一行聚合数据
pub fn bucket_row(id: i64, bucket_id: i64, folder: &str, count: i64) -> MediaRow {
    MediaRow {
        count: Some(count),
        ..image_row(id, bucket_id, folder, 0)
    }
}
