// ==========================================
// 畜牧饲料成本核算引擎 - 配置层
// ==========================================
// 职责: 引擎配置加载与校验
// 存储: JSON 配置文件
// ==========================================

pub mod config_manager;
pub mod engine_config;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager, ConfigSource};
pub use engine_config::{ConfigError, EngineConfig};
