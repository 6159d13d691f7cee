//! KPicture 数据模型模块
//!
//! 包含所有数据结构定义

pub mod album;
pub mod filter;
pub mod index;
pub mod media;
pub mod settings;

// 重新导出常用类型
pub use album::{AlbumGroup, ALL_BUCKET_ID};
pub use filter::{FilterConfiguration, FilterConfigurationBuilder};
pub use index::{IndexQuery, MediaRow, Projection};
pub use media::{MediaRecord, MediaType};
pub use settings::{AlbumLabels, Platform, PickerSettings};

/// 可选的媒体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    #[default]
    All,
}

/// 排序方向（按修改时间）
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Desc,
    Asc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}
