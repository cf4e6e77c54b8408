// ==========================================
// 畜牧饲料成本核算引擎 - 引擎配置
// ==========================================
// 职责: 可配置参数 (饲料成本类目 / 缺失饲喂日检测 / 参考日期 / 容差) 与校验
// 红线: 配置非法立即失败,错误指明配置项
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配置错误
///
/// 配置非法属于编程错误,必须立即失败并指出具体配置项
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件解析失败 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值非法 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },
}

/// 引擎配置（持久化对象）
///
/// 所有字段均有默认值,配置文件只需写需要覆盖的项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 计入饲料成本的流水类目（不区分大小写）
    pub feed_cost_categories: Vec<String>,

    /// 是否检测在栏期间缺失饲喂日
    pub detect_missing_feed_days: bool,

    /// 每个统计范围最多输出的缺失饲喂日明细条数（汇总计数不受限）
    pub max_missing_day_issues: usize,

    /// 固定参考日期（代替 today，用于复现历史报表）
    pub reference_date: Option<NaiveDate>,

    /// 金额/数量比较容差
    pub tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            feed_cost_categories: vec!["Futterkosten".to_string()],
            detect_missing_feed_days: true,
            max_missing_day_issues: 60,
            reference_date: None,
            tolerance: 1e-6,
        }
    }
}

impl EngineConfig {
    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed_cost_categories.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: super::config_keys::FEED_COST_CATEGORIES.to_string(),
                message: "至少需要一个饲料成本类目".to_string(),
            });
        }

        if let Some(blank) = self
            .feed_cost_categories
            .iter()
            .position(|c| c.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                key: super::config_keys::FEED_COST_CATEGORIES.to_string(),
                message: format!("第 {} 项为空", blank + 1),
            });
        }

        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: super::config_keys::TOLERANCE.to_string(),
                message: format!("容差必须为非负有限数: {}", self.tolerance),
            });
        }

        Ok(())
    }

    /// 参考日期（未配置时取调用方提供的 today）
    pub fn reference_date_or(&self, today: NaiveDate) -> NaiveDate {
        self.reference_date.unwrap_or(today)
    }
}
