//! 过滤配置数据模型
//!
//! [`FilterConfiguration`] 构造后不可变，只能通过 [`FilterConfigurationBuilder`] 生成新实例。

use serde::{Deserialize, Serialize};

use super::{MediaKind, SortOrder};
use crate::utils::error::{AppError, AppResult};

/// 媒体过滤配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfiguration {
    /// 可选的媒体类型
    media_kind: MediaKind,
    /// 文件最小大小（字节）
    file_size_min: u64,
    /// 文件最大大小（字节，0 表示不限制）
    file_size_max: u64,
    /// 视频最小时长（毫秒）
    duration_min: u64,
    /// 视频最大时长（毫秒，0 表示不限制）
    duration_max: u64,
    allow_gif: bool,
    allow_webp: bool,
    allow_bmp: bool,
    /// image/x-ms-bmp
    allow_bmp_variant_a: bool,
    /// image/vnd.wap.wbmp
    allow_bmp_variant_b: bool,
    allow_heic: bool,
    /// 按修改时间排序
    sort_order: SortOrder,
}

impl Default for FilterConfiguration {
    fn default() -> Self {
        Self {
            media_kind: MediaKind::All,
            file_size_min: 0,
            file_size_max: 0,
            duration_min: 0,
            duration_max: 0,
            allow_gif: false,
            allow_webp: false,
            allow_bmp: false,
            allow_bmp_variant_a: false,
            allow_bmp_variant_b: false,
            allow_heic: false,
            sort_order: SortOrder::Desc,
        }
    }
}

impl FilterConfiguration {
    /// 创建构建者（默认值与 `FilterConfiguration::default()` 相同）
    pub fn builder() -> FilterConfigurationBuilder {
        FilterConfigurationBuilder {
            config: Self::default(),
        }
    }

    /// 以当前配置为起点创建构建者
    pub fn to_builder(&self) -> FilterConfigurationBuilder {
        FilterConfigurationBuilder {
            config: self.clone(),
        }
    }

    pub fn media_kind(&self) -> MediaKind {
        self.media_kind
    }

    pub fn file_size_min(&self) -> u64 {
        self.file_size_min
    }

    pub fn file_size_max(&self) -> u64 {
        self.file_size_max
    }

    pub fn duration_min(&self) -> u64 {
        self.duration_min
    }

    pub fn duration_max(&self) -> u64 {
        self.duration_max
    }

    pub fn allow_gif(&self) -> bool {
        self.allow_gif
    }

    pub fn allow_webp(&self) -> bool {
        self.allow_webp
    }

    pub fn allow_bmp(&self) -> bool {
        self.allow_bmp
    }

    pub fn allow_bmp_variant_a(&self) -> bool {
        self.allow_bmp_variant_a
    }

    pub fn allow_bmp_variant_b(&self) -> bool {
        self.allow_bmp_variant_b
    }

    pub fn allow_heic(&self) -> bool {
        self.allow_heic
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }
}

/// 过滤配置构建者
///
/// 大小与时长的设置方法接受 `Option`，传入 `None`（未提供参数）会立即返回
/// [`AppError::InvalidArgument`]。
#[derive(Debug, Clone)]
pub struct FilterConfigurationBuilder {
    config: FilterConfiguration,
}

impl FilterConfigurationBuilder {
    /// 设置媒体类型
    pub fn media_kind(mut self, media_kind: MediaKind) -> Self {
        self.config.media_kind = media_kind;
        self
    }

    /// 设置文件最小大小（字节）
    pub fn file_min_size(mut self, bytes: impl Into<Option<u64>>) -> AppResult<Self> {
        self.config.file_size_min = require(bytes.into(), "fileMinSize")?;
        Ok(self)
    }

    /// 设置文件最大大小（字节，0 表示不限制）
    pub fn file_max_size(mut self, bytes: impl Into<Option<u64>>) -> AppResult<Self> {
        self.config.file_size_max = require(bytes.into(), "fileMaxSize")?;
        Ok(self)
    }

    /// 设置视频最小时长（毫秒）
    pub fn duration_min(mut self, millis: impl Into<Option<u64>>) -> AppResult<Self> {
        self.config.duration_min = require(millis.into(), "durationMin")?;
        Ok(self)
    }

    /// 设置视频最大时长（毫秒，0 表示不限制）
    pub fn duration_max(mut self, millis: impl Into<Option<u64>>) -> AppResult<Self> {
        self.config.duration_max = require(millis.into(), "durationMax")?;
        Ok(self)
    }

    pub fn allow_gif(mut self, allow: bool) -> Self {
        self.config.allow_gif = allow;
        self
    }

    pub fn allow_webp(mut self, allow: bool) -> Self {
        self.config.allow_webp = allow;
        self
    }

    pub fn allow_bmp(mut self, allow: bool) -> Self {
        self.config.allow_bmp = allow;
        self
    }

    pub fn allow_bmp_variant_a(mut self, allow: bool) -> Self {
        self.config.allow_bmp_variant_a = allow;
        self
    }

    pub fn allow_bmp_variant_b(mut self, allow: bool) -> Self {
        self.config.allow_bmp_variant_b = allow;
        self
    }

    pub fn allow_heic(mut self, allow: bool) -> Self {
        self.config.allow_heic = allow;
        self
    }

    /// 设置排序方式
    pub fn sort_order(mut self, sort_order: SortOrder) -> Self {
        self.config.sort_order = sort_order;
        self
    }

    pub fn build(self) -> FilterConfiguration {
        self.config
    }
}

fn require(value: Option<u64>, name: &str) -> AppResult<u64> {
    value.ok_or_else(|| AppError::InvalidArgument(format!("{} 未提供参数", name)))
}
