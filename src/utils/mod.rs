//! KPicture 工具模块
//!
//! 包含通用工具函数

pub mod error;
pub mod mime;

pub use error::*;
