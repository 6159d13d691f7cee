//! 媒体索引查询模型
//!
//! 描述发往媒体索引的查询以及返回的原始行

/// 媒体索引列名
pub mod columns {
    pub const ID: &str = "_id";
    pub const DATA: &str = "_data";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const SIZE: &str = "_size";
    pub const DURATION: &str = "duration";
    pub const MIME_TYPE: &str = "mime_type";
    pub const DATE_ADDED: &str = "date_added";
    pub const DISPLAY_NAME: &str = "_display_name";
    pub const ORIENTATION: &str = "orientation";
    pub const BUCKET_ID: &str = "bucket_id";
    pub const BUCKET_DISPLAY_NAME: &str = "bucket_display_name";
    pub const DATE_MODIFIED: &str = "date_modified";
    pub const MEDIA_TYPE: &str = "media_type";
    /// 聚合查询中的数量列
    pub const COUNT: &str = "count";
}

/// 固定投影列（顺序即文档顺序）
pub const PROJECTION: [&str; 13] = [
    columns::ID,
    columns::DATA,
    columns::WIDTH,
    columns::HEIGHT,
    columns::SIZE,
    columns::DURATION,
    columns::MIME_TYPE,
    columns::DATE_ADDED,
    columns::DISPLAY_NAME,
    columns::ORIENTATION,
    columns::BUCKET_ID,
    columns::BUCKET_DISPLAY_NAME,
    columns::DATE_MODIFIED,
];

/// 索引中 media_type 列的取值
pub const MEDIA_TYPE_IMAGE: i64 = 1;
pub const MEDIA_TYPE_VIDEO: i64 = 3;

/// 查询形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// 每个媒体文件一行
    Records,
    /// 每个 bucket 一行，附带 `count` 列
    BucketCounts,
}

/// 发往媒体索引的只读查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexQuery {
    pub projection: Projection,
    /// WHERE 子句（不含 WHERE），使用 `?` 占位
    pub selection: String,
    /// 按占位顺序排列的绑定参数
    pub selection_args: Vec<String>,
    /// ORDER BY 子句（不含 ORDER BY）
    pub sort_order: String,
}

/// 媒体索引返回的一行原始数据
///
/// 可为空的文本列保留为 `Option`，由解析器决定回退值。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaRow {
    pub id: i64,
    pub data: Option<String>,
    pub width: i64,
    pub height: i64,
    pub size: i64,
    pub duration: i64,
    pub mime_type: Option<String>,
    pub date_added: i64,
    pub display_name: Option<String>,
    pub orientation: i64,
    pub bucket_id: i64,
    pub bucket_display_name: Option<String>,
    pub date_modified: i64,
    /// 仅聚合查询返回
    pub count: Option<i64>,
}

impl MediaRow {
    /// 绝对路径（缺失时为空串）
    pub fn absolute_path(&self) -> &str {
        self.data.as_deref().unwrap_or("")
    }

    /// 原始 MIME 类型（缺失时为空串）
    pub fn raw_mime_type(&self) -> &str {
        self.mime_type.as_deref().unwrap_or("")
    }
}
