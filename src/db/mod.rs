//! KPicture 数据库模块
//!
//! SQLite 实现的媒体索引：连接管理、Schema 与数据访问层

pub mod schema;
pub mod connection;
pub mod media_dao;

// 重新导出常用类型
pub use connection::{Database, DatabaseStats, default_db_path};
pub use media_dao::NewMediaEntry;
