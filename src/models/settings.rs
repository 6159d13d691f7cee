//! 选择器设置数据模型

use serde::{Deserialize, Serialize};

use super::FilterConfiguration;

/// 平台能力分支
///
/// `Modern` 平台通过间接引用访问媒体文件，并且媒体索引不支持分组聚合查询；
/// `Legacy` 平台直接使用绝对路径，并可返回按 bucket 预聚合的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Platform {
    #[default]
    Modern,
    Legacy,
}

impl Platform {
    pub fn uses_indirect_reference(&self) -> bool {
        matches!(self, Platform::Modern)
    }
}

/// 本地化文案
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlbumLabels {
    /// “全部媒体”相册名称
    pub all_media: String,
    /// 缺少相册名称时的占位名称
    pub untitled: String,
}

impl Default for AlbumLabels {
    fn default() -> Self {
        Self {
            all_media: String::from("最近相册"),
            untitled: String::from("未命名相册"),
        }
    }
}

/// 选择器设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PickerSettings {
    /// 过滤配置
    pub filter: FilterConfiguration,
    /// 是否使用轻量扫描（只统计数量，延迟加载媒体列表）
    pub lightweight_scan: bool,
    /// 平台分支
    pub platform: Platform,
    /// 文案
    pub labels: AlbumLabels,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            filter: FilterConfiguration::default(),
            lightweight_scan: true,
            platform: Platform::default(),
            labels: AlbumLabels::default(),
        }
    }
}
