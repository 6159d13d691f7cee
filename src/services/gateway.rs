//! 媒体索引抽象
//!
//! 引擎只通过 [`MediaIndex`] 读取媒体索引，不依赖具体平台实现。

use std::sync::Arc;

use crate::models::{IndexQuery, MediaRow, MediaType};
use crate::utils::error::AppResult;

const IMAGES_CONTENT_URI: &str = "content://media/external/images/media";
const VIDEO_CONTENT_URI: &str = "content://media/external/video/media";
const FILES_CONTENT_URI: &str = "content://media/external/file";

/// 可查询的媒体索引
///
/// `query` 返回前必须释放底层游标等资源；实现不得在返回值之外持有游标。
pub trait MediaIndex: Send + Sync {
    /// 执行只读查询
    fn query(&self, query: &IndexQuery) -> AppResult<Vec<MediaRow>>;

    /// 将 (id, 媒体类型) 映射为稳定的间接引用
    fn content_reference(&self, id: i64, media_type: MediaType) -> String {
        content_reference(id, media_type)
    }
}

/// 共享的媒体索引
pub type SharedMediaIndex = Arc<dyn MediaIndex>;

/// 默认的间接引用格式：`content://media/external/{images|video}/media/{id}`
pub fn content_reference(id: i64, media_type: MediaType) -> String {
    let base = match media_type {
        MediaType::Image => IMAGES_CONTENT_URI,
        MediaType::Video => VIDEO_CONTENT_URI,
        MediaType::Other => FILES_CONTENT_URI,
    };
    format!("{}/{}", base, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_reference_by_kind() {
        assert_eq!(
            content_reference(12, MediaType::Image),
            "content://media/external/images/media/12"
        );
        assert_eq!(
            content_reference(7, MediaType::Video),
            "content://media/external/video/media/7"
        );
        assert_eq!(content_reference(3, MediaType::Other), "content://media/external/file/3");
    }
}
