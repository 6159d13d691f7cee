//! 数据库 Schema 定义
//!
//! 媒体索引表的 CREATE 语句和迁移脚本。列名与移动端系统媒体库保持一致。

/// 数据库版本
pub const SCHEMA_VERSION: i32 = 2;

/// [`INIT_SCHEMA`] 对应的版本，之后的变更由 [`MIGRATIONS`] 完成
pub const BASE_VERSION: i32 = 1;

/// 初始化 Schema SQL
pub const INIT_SCHEMA: &str = r#"
-- 媒体文件表
CREATE TABLE IF NOT EXISTS files (
    _id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    _data               TEXT NOT NULL UNIQUE,
    width               INTEGER NOT NULL DEFAULT 0,
    height              INTEGER NOT NULL DEFAULT 0,
    _size               INTEGER NOT NULL DEFAULT 0,
    duration            INTEGER NOT NULL DEFAULT 0,
    mime_type           TEXT,
    date_added          INTEGER NOT NULL DEFAULT 0,
    _display_name       TEXT,
    orientation         INTEGER NOT NULL DEFAULT 0,
    bucket_id           INTEGER NOT NULL,
    bucket_display_name TEXT,
    date_modified       INTEGER NOT NULL DEFAULT 0,
    media_type          INTEGER NOT NULL DEFAULT 0
);

-- 版本表
CREATE TABLE IF NOT EXISTS schema_version (
    version     INTEGER PRIMARY KEY,
    applied_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_files_bucket_id ON files(bucket_id);
CREATE INDEX IF NOT EXISTS idx_files_media_type ON files(media_type);
"#;

/// 迁移脚本
pub struct Migration {
    pub version: i32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// 所有迁移（按版本升序）
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 2,
    description: "Add composite media_type/date_modified index for sorted scans",
    sql: "CREATE INDEX IF NOT EXISTS idx_files_type_modified ON files(media_type, date_modified);",
}];
