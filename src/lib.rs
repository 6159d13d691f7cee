//! KPicture 核心库
//!
//! 相册选择器的媒体过滤、查询构建与相册分组引擎。
//!
//! - `models`: 数据结构（过滤配置、媒体文件、相册、设置）
//! - `db`: SQLite 媒体索引
//! - `services`: 查询构建、行解析、分组策略、扫描服务、目录索引
//! - `dispatch`: 扫描结果回调分发
//! - `utils`: 错误处理与 MIME 工具
//!
//! ```no_run
//! use std::sync::Arc;
//! use kpicture_lib::{AlbumScanner, Database, InlineDispatcher, PickerSettings};
//!
//! # async fn run() -> kpicture_lib::utils::AppResult<()> {
//! let db = Database::open(kpicture_lib::db::default_db_path())?;
//! db.init()?;
//!
//! let scanner = AlbumScanner::with_current_runtime(Arc::new(db), Arc::new(InlineDispatcher))?;
//! let albums = scanner.scan_albums(PickerSettings::default()).await;
//! println!("{} 个相册", albums.len());
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod dispatch;
pub mod models;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use db::{Database, DatabaseStats};
pub use dispatch::{
    DispatchQueue, InlineDispatcher, ResultDispatcher, SharedDispatcher, TaskQueueDispatcher,
};
pub use models::{
    AlbumGroup, AlbumLabels, FilterConfiguration, FilterConfigurationBuilder, MediaKind,
    MediaRecord, MediaType, PickerSettings, Platform, SortOrder, ALL_BUCKET_ID,
};
pub use services::{AlbumScanner, MediaIndex, MediaIndexer, SettingsManager};
pub use utils::{AppError, AppResult, CommandError};

/// 安装全局日志订阅器
///
/// 默认级别为 INFO，可通过 `RUST_LOG` 覆盖。重复调用不会报错。
pub fn init_tracing() {
    let result = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    if result.is_ok() {
        tracing::info!("KPicture {} 日志已初始化", env!("CARGO_PKG_VERSION"));
    }
}
