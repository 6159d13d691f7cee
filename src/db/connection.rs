//! 数据库连接管理
//!
//! 提供 SQLite 连接与 Schema 初始化

use rusqlite::{Connection, OpenFlags};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::utils::error::{AppError, AppResult};

use super::schema::{BASE_VERSION, INIT_SCHEMA, MIGRATIONS, SCHEMA_VERSION};

/// 数据库连接管理器
#[derive(Clone)]
pub struct Database {
    /// 数据库连接（使用 Arc<Mutex> 实现线程安全）
    conn: Arc<Mutex<Connection>>,
    /// 数据库文件路径
    path: PathBuf,
}

impl Database {
    /// 打开或创建数据库
    pub fn open(path: PathBuf) -> AppResult<Self> {
        // 确保父目录存在
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };
        db.configure()?;

        tracing::info!("媒体索引已打开: {}", db.path.display());
        Ok(db)
    }

    /// 打开内存数据库（用于测试）
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        };
        db.configure()?;

        Ok(db)
    }

    /// 配置数据库连接
    fn configure(&self) -> AppResult<()> {
        let conn = self.connection()?;

        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA cache_size = -16000;
            PRAGMA temp_store = MEMORY;
            PRAGMA busy_timeout = 5000;
            "#,
        )?;

        Ok(())
    }

    /// 初始化数据库 Schema
    pub fn init(&self) -> AppResult<()> {
        let conn = self.connection()?;

        let table_exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
                [],
                |row| row.get(0),
            )
            .unwrap_or(false);

        if !table_exists {
            tracing::info!("初始化数据库 Schema...");

            conn.execute_batch(INIT_SCHEMA)?;
            conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                rusqlite::params![BASE_VERSION],
            )?;

            tracing::info!("数据库 Schema 初始化完成，版本: {}", BASE_VERSION);
        }

        Self::migrate_internal(&conn)
    }

    /// 执行数据库迁移
    fn migrate_internal(conn: &Connection) -> AppResult<()> {
        let current_version: i32 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                row.get::<_, Option<i32>>(0)
            })?
            .unwrap_or(0);

        tracing::debug!("当前数据库版本: {}", current_version);
        if current_version > SCHEMA_VERSION {
            tracing::warn!(
                "数据库版本 {} 高于当前支持的版本 {}",
                current_version,
                SCHEMA_VERSION
            );
        }

        for migration in MIGRATIONS {
            if migration.version > current_version {
                tracing::info!("执行迁移 v{}: {}", migration.version, migration.description);

                conn.execute_batch(migration.sql)?;
                conn.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    rusqlite::params![migration.version],
                )?;
            }
        }

        Ok(())
    }

    /// 获取数据库连接（用于执行查询）
    ///
    /// 返回的守卫在作用域结束时释放连接。
    pub fn connection(&self) -> AppResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            AppError::Database(rusqlite::Error::InvalidParameterName(e.to_string()))
        })
    }

    /// 执行事务
    pub fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    /// 获取数据库文件路径
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// 获取数据库统计信息
    pub fn stats(&self) -> AppResult<DatabaseStats> {
        let conn = self.connection()?;

        let (media_count, image_count, video_count, bucket_count): (i64, i64, i64, i64) = conn
            .query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(media_type = ?1), 0),
                        COALESCE(SUM(media_type = ?2), 0),
                        COUNT(DISTINCT bucket_id)
                 FROM files",
                rusqlite::params![
                    crate::models::index::MEDIA_TYPE_IMAGE,
                    crate::models::index::MEDIA_TYPE_VIDEO
                ],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?;

        let db_size = std::fs::metadata(&self.path)
            .map(|m| m.len() as i64)
            .unwrap_or(0);

        Ok(DatabaseStats {
            media_count,
            image_count,
            video_count,
            bucket_count,
            db_size,
        })
    }
}

/// 数据库统计信息
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStats {
    pub media_count: i64,
    pub image_count: i64,
    pub video_count: i64,
    pub bucket_count: i64,
    pub db_size: i64,
}

/// 获取默认数据库路径
///
/// Windows: %APPDATA%/KPicture/kpicture.db
/// macOS: ~/Library/Application Support/KPicture/kpicture.db
/// Linux: ~/.local/share/KPicture/kpicture.db
pub fn default_db_path() -> PathBuf {
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("KPicture").join("kpicture.db")
}
