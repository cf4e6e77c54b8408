// ==========================================
// 畜牧饲料成本核算引擎 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、输出对象
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod batch;
pub mod cycle;
pub mod farm;
pub mod feed;
pub mod metrics;
pub mod pivot;
pub mod quality;
pub mod transaction;
pub mod types;

// 重导出核心类型
pub use batch::{BatchReport, CycleBatch, CycleReport};
pub use cycle::{merge_intervals, DateInterval, LivestockCycle, OccupancyDetail};
pub use farm::{Area, AreaGroup, FarmDirectory};
pub use feed::{ConsumptionItem, ConsumptionRecord, FeedType, PriceTier};
pub use metrics::{AreaMetrics, CycleMetrics, FeedComponentSummary};
pub use pivot::{
    format_cell, PivotColumnHeader, PivotConfig, PivotRow, PivotTableData, PivotTableRow,
    PivotValue,
};
pub use quality::{DataQualityReport, DqIssue, DqSummary};
pub use transaction::{CostTransaction, IncomeTransaction};
pub use types::{
    DqIssueKind, DqLevel, OccupancyKind, PivotAggregation, PivotDimension, PivotField, ScopeKey,
};
