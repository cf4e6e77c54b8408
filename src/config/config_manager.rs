// ==========================================
// 畜牧饲料成本核算引擎 - 配置管理器
// ==========================================
// 职责: 配置加载 (显式路径 > 环境变量 > 用户配置目录 > 默认值) 与校验
// 存储: JSON 文件
// ==========================================

use crate::config::engine_config::{ConfigError, EngineConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    /// 指定配置文件路径的环境变量
    pub const CONFIG_PATH_ENV: &str = "FEED_COST_CONFIG";

    pub const FEED_COST_CATEGORIES: &str = "feed_cost_categories";
    pub const DETECT_MISSING_FEED_DAYS: &str = "detect_missing_feed_days";
    pub const MAX_MISSING_DAY_ISSUES: &str = "max_missing_day_issues";
    pub const REFERENCE_DATE: &str = "reference_date";
    pub const TOLERANCE: &str = "tolerance";
}

/// 配置目录下的应用子目录名
const APP_DIR_NAME: &str = "livestock-feed-cost";
const CONFIG_FILE_NAME: &str = "config.json";

// ==========================================
// ConfigSource - 配置来源
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: EngineConfig,
    source: ConfigSource,
}

impl ConfigManager {
    /// 使用默认配置
    pub fn with_defaults() -> Self {
        Self {
            config: EngineConfig::default(),
            source: ConfigSource::Defaults,
        }
    }

    /// 从指定文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径 (JSON)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: shown.clone(),
            message: e.to_string(),
        })?;

        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: shown.clone(),
                message: e.to_string(),
            })?;
        config.validate()?;

        info!(path = %shown, "已加载引擎配置");
        Ok(Self {
            config,
            source: ConfigSource::File(path.to_path_buf()),
        })
    }

    /// 按优先级加载配置
    ///
    /// 1. `FEED_COST_CONFIG` 环境变量指定的文件 (必须存在)
    /// 2. 用户配置目录下的 `livestock-feed-cost/config.json` (存在时)
    /// 3. 默认配置
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(config_keys::CONFIG_PATH_ENV) {
            if !path.trim().is_empty() {
                return Self::from_file(path.trim());
            }
        }

        if let Some(path) = Self::default_config_path() {
            if path.is_file() {
                return Self::from_file(path);
            }
            debug!(path = %path.display(), "默认配置文件不存在,使用默认配置");
        }

        Ok(Self::with_defaults())
    }

    /// 用户配置目录下的默认配置文件路径
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_file_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"feed_cost_categories":["Futterkosten","Mineralfutter"],"reference_date":"2024-02-01"}}"#
        )
        .unwrap();

        let manager = ConfigManager::from_file(file.path()).unwrap();
        let config = manager.config();

        assert_eq!(config.feed_cost_categories.len(), 2);
        assert!(config.detect_missing_feed_days);
        assert_eq!(
            config.reference_date,
            chrono::NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert_eq!(manager.source(), &ConfigSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_from_file_rejects_empty_categories() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"feed_cost_categories":[]}}"#).unwrap();

        let err = ConfigManager::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains(config_keys::FEED_COST_CATEGORIES));
    }

    #[test]
    fn test_from_file_missing_file() {
        let err = ConfigManager::from_file("/nonexistent/feed-cost.json").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
