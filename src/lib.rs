// ==========================================
// 畜牧饲料成本核算引擎 - 核心库
// ==========================================
// 职责: 饲料计价 / 在栏过滤 / 成本分摊 / 周期与栏位指标 / 透视汇总
// 系统定位: 纯计算库 (数据访问由调用方预批量提供)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 计算规则
pub mod engine;

// 导入层 - 外部文件
pub mod importer;

// 配置层 - 引擎配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    DqIssueKind, DqLevel, OccupancyKind, PivotAggregation, PivotDimension, PivotField, ScopeKey,
};

// 领域实体
pub use domain::{
    AreaMetrics, BatchReport, ConsumptionItem, ConsumptionRecord, CostTransaction, CycleBatch,
    CycleMetrics, CycleReport, DataQualityReport, FeedComponentSummary, IncomeTransaction,
    LivestockCycle, OccupancyDetail, PivotConfig, PivotRow, PivotTableData, PriceTier,
};

// 引擎
pub use engine::{
    AreaMetricsCalculator, ConsumptionCostJoiner, CycleMetricsCalculator, CycleReportOrchestrator,
    DataQualityInspector, FeedComponentSummarizer, PivotEngine, PivotError, PriceResolver,
    TimeframeFilter,
};

// 配置
pub use config::{ConfigError, ConfigManager, EngineConfig};

// 导入
pub use importer::{ImportError, ImportResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "畜牧饲料成本核算引擎";
