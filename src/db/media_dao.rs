//! 媒体文件数据访问
//!
//! 写入由目录索引器调用；读取通过 [`MediaIndex`] 提供给相册扫描。

use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::index::{columns, PROJECTION};
use crate::models::{IndexQuery, MediaRow, Projection};
use crate::services::gateway::MediaIndex;
use crate::utils::error::AppResult;

/// 待写入的媒体文件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMediaEntry {
    pub path: String,
    pub display_name: Option<String>,
    pub width: i64,
    pub height: i64,
    pub size: i64,
    /// 毫秒
    pub duration: i64,
    pub mime_type: Option<String>,
    /// 秒级时间戳
    pub date_added: i64,
    /// 秒级时间戳
    pub date_modified: i64,
    pub orientation: i64,
    pub bucket_id: i64,
    pub bucket_display_name: Option<String>,
    /// 见 [`MEDIA_TYPE_IMAGE`](crate::models::index::MEDIA_TYPE_IMAGE)
    pub media_type: i64,
}

const UPSERT_SQL: &str = r#"
INSERT INTO files (
    _data, width, height, _size, duration, mime_type, date_added, _display_name,
    orientation, bucket_id, bucket_display_name, date_modified, media_type
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
ON CONFLICT(_data) DO UPDATE SET
    width = excluded.width,
    height = excluded.height,
    _size = excluded._size,
    duration = excluded.duration,
    mime_type = excluded.mime_type,
    _display_name = excluded._display_name,
    orientation = excluded.orientation,
    bucket_id = excluded.bucket_id,
    bucket_display_name = excluded.bucket_display_name,
    date_modified = excluded.date_modified,
    media_type = excluded.media_type
"#;

fn upsert_with(conn: &rusqlite::Connection, entry: &NewMediaEntry) -> AppResult<i64> {
    conn.execute(
        UPSERT_SQL,
        params![
            entry.path,
            entry.width,
            entry.height,
            entry.size,
            entry.duration,
            entry.mime_type,
            entry.date_added,
            entry.display_name,
            entry.orientation,
            entry.bucket_id,
            entry.bucket_display_name,
            entry.date_modified,
            entry.media_type,
        ],
    )?;
    let id = conn.query_row(
        "SELECT _id FROM files WHERE _data = ?1",
        params![entry.path],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// 可为空的整数列按 0 处理
fn int_or_zero(row: &Row<'_>, idx: usize) -> rusqlite::Result<i64> {
    Ok(row.get::<_, Option<i64>>(idx)?.unwrap_or(0))
}

fn row_to_media(row: &Row<'_>, with_count: bool) -> rusqlite::Result<MediaRow> {
    Ok(MediaRow {
        id: row.get(0)?,
        data: row.get(1)?,
        width: int_or_zero(row, 2)?,
        height: int_or_zero(row, 3)?,
        size: int_or_zero(row, 4)?,
        duration: int_or_zero(row, 5)?,
        mime_type: row.get(6)?,
        date_added: int_or_zero(row, 7)?,
        display_name: row.get(8)?,
        orientation: int_or_zero(row, 9)?,
        bucket_id: int_or_zero(row, 10)?,
        bucket_display_name: row.get(11)?,
        date_modified: int_or_zero(row, 12)?,
        count: if with_count { row.get(13)? } else { None },
    })
}

/// 生成 SELECT 语句
///
/// 聚合查询按 bucket 分组，非聚合列取自组内最近修改的一行。
pub fn select_sql(query: &IndexQuery) -> String {
    let projection = PROJECTION.join(", ");
    match query.projection {
        Projection::Records => format!(
            "SELECT {} FROM files WHERE {} ORDER BY {}",
            projection, query.selection, query.sort_order
        ),
        Projection::BucketCounts => format!(
            "SELECT {proj}, COUNT(*) AS \"{count}\", MAX({modified}) AS _latest FROM files \
             WHERE {sel} GROUP BY {bucket} ORDER BY {sort}",
            proj = projection,
            count = columns::COUNT,
            modified = columns::DATE_MODIFIED,
            sel = query.selection,
            bucket = columns::BUCKET_ID,
            sort = query.sort_order,
        ),
    }
}

impl Database {
    /// 写入或更新媒体文件（以路径为唯一键），返回 `_id`
    pub fn upsert_media(&self, entry: &NewMediaEntry) -> AppResult<i64> {
        let conn = self.connection()?;
        upsert_with(&conn, entry)
    }

    /// 批量写入
    pub fn upsert_media_batch(&self, entries: &[NewMediaEntry]) -> AppResult<usize> {
        self.transaction(|conn| {
            for entry in entries {
                upsert_with(conn, entry)?;
            }
            Ok(entries.len())
        })
    }

    /// 按路径获取媒体文件
    pub fn get_media_by_path(&self, path: &str) -> AppResult<Option<MediaRow>> {
        let conn = self.connection()?;
        let sql = format!(
            "SELECT {} FROM files WHERE {} = ?1",
            PROJECTION.join(", "),
            columns::DATA
        );
        let row = conn
            .query_row(&sql, params![path], |row| row_to_media(row, false))
            .optional()?;
        Ok(row)
    }

    /// 按路径删除
    pub fn delete_media_by_path(&self, path: &str) -> AppResult<bool> {
        let conn = self.connection()?;
        let affected = conn.execute("DELETE FROM files WHERE _data = ?1", params![path])?;
        Ok(affected > 0)
    }

    /// 删除不在 `keep` 中、且位于 `prefix` 目录下的记录
    pub fn prune_missing(&self, prefix: &str, keep: &[String]) -> AppResult<usize> {
        self.transaction(|conn| {
            let mut stmt = conn.prepare("SELECT _data FROM files WHERE substr(_data, 1, length(?1)) = ?1")?;
            let existing: Vec<String> = stmt
                .query_map(params![prefix], |row| row.get(0))?
                .filter_map(|r| r.ok())
                .collect();

            let keep: std::collections::HashSet<&str> = keep.iter().map(String::as_str).collect();
            let mut removed = 0;
            for path in existing.iter().filter(|p| !keep.contains(p.as_str())) {
                removed += conn.execute("DELETE FROM files WHERE _data = ?1", params![path])?;
            }
            Ok(removed)
        })
    }

    /// 媒体文件总数
    pub fn count_media(&self) -> AppResult<i64> {
        let conn = self.connection()?;
        let count = conn.query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl MediaIndex for Database {
    fn query(&self, query: &IndexQuery) -> AppResult<Vec<MediaRow>> {
        let sql = select_sql(query);
        tracing::debug!(sql = %sql, args = ?query.selection_args, "查询媒体索引");

        let with_count = query.projection == Projection::BucketCounts;
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(query.selection_args.iter()), |row| {
                row_to_media(row, with_count)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
