//! KPicture 服务模块
//!
//! 包含所有业务逻辑服务

pub mod album_scanner;
pub mod gateway;
pub mod grouping;
pub mod indexer;
pub mod parser;
pub mod query;
pub mod settings;
pub mod walker;

#[cfg(test)]
pub(crate) mod testing;

// 重新导出常用类型
pub use album_scanner::AlbumScanner;
pub use gateway::{MediaIndex, SharedMediaIndex};
pub use grouping::{
    query_bucket, select_grouping, AlbumGrouping, FullScanGrouping, LightweightGrouping,
};
pub use indexer::{bucket_id_for, IndexOptions, IndexResult, MediaIndexer};
pub use parser::{RecordParser, RejectReason};
pub use query::{build_condition, build_query, QueryCondition};
pub use settings::SettingsManager;
pub use walker::{MediaWalker, WalkOptions, WalkResult};
