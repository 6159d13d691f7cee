//! 选择器设置服务
//!
//! 负责 settings.json 的读取、保存和重置

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::PickerSettings;
use crate::utils::error::{AppError, AppResult};

const SETTINGS_FILE: &str = "settings.json";

/// 设置管理器
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    /// 在指定目录下创建设置管理器
    pub fn new(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .map_err(|e| AppError::Config(format!("无法创建设置目录: {}", e)))?;

        Ok(Self {
            settings_path: dir.join(SETTINGS_FILE),
        })
    }

    /// 使用系统数据目录（如 ~/.local/share/KPicture）
    pub fn with_default_dir() -> AppResult<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| AppError::Config("无法获取应用数据目录".to_string()))?;
        Self::new(base.join("KPicture"))
    }

    /// 设置文件路径
    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    /// 加载设置
    pub fn load(&self) -> AppResult<PickerSettings> {
        if !self.settings_path.exists() {
            tracing::info!("设置文件不存在，使用默认设置");
            return Ok(PickerSettings::default());
        }

        let content = fs::read_to_string(&self.settings_path)
            .map_err(|e| AppError::Config(format!("无法读取设置文件: {}", e)))?;

        let settings: PickerSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("设置文件格式错误: {}", e)))?;

        tracing::info!("成功加载设置: {:?}", self.settings_path);
        Ok(settings)
    }

    /// 保存设置
    pub fn save(&self, settings: &PickerSettings) -> AppResult<()> {
        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::Config(format!("无法序列化设置: {}", e)))?;

        fs::write(&self.settings_path, content)
            .map_err(|e| AppError::Config(format!("无法保存设置文件: {}", e)))?;

        tracing::info!("成功保存设置: {:?}", self.settings_path);
        Ok(())
    }

    /// 重置为默认设置
    pub fn reset(&self) -> AppResult<PickerSettings> {
        let default_settings = PickerSettings::default();
        self.save(&default_settings)?;
        Ok(default_settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterConfiguration, MediaKind, Platform};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(dir.path()).unwrap();
        assert_eq!(manager.load().unwrap(), PickerSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(dir.path().join("nested")).unwrap();

        let settings = PickerSettings {
            filter: FilterConfiguration::builder()
                .media_kind(MediaKind::Video)
                .duration_min(3000)
                .unwrap()
                .build(),
            lightweight_scan: false,
            platform: Platform::Legacy,
            ..PickerSettings::default()
        };
        manager.save(&settings).unwrap();
        assert!(manager.path().exists());
        assert_eq!(manager.load().unwrap(), settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(dir.path()).unwrap();
        fs::write(manager.path(), r#"{"platform":"legacy","filter":{"allowGif":true}}"#).unwrap();

        let settings = manager.load().unwrap();
        assert_eq!(settings.platform, Platform::Legacy);
        assert!(settings.lightweight_scan);
        assert!(settings.filter.allow_gif());
        assert!(!settings.filter.allow_webp());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(dir.path()).unwrap();
        fs::write(manager.path(), "{ not json").unwrap();
        assert!(matches!(manager.load(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_reset() {
        let dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(dir.path()).unwrap();
        manager
            .save(&PickerSettings {
                lightweight_scan: false,
                ..PickerSettings::default()
            })
            .unwrap();
        assert_eq!(manager.reset().unwrap(), PickerSettings::default());
        assert_eq!(manager.load().unwrap(), PickerSettings::default());
    }
}
