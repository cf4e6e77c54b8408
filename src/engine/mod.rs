// ==========================================
// 畜牧饲料成本核算引擎 - 引擎层
// ==========================================
// 职责: 价格解析 / 计价 / 在栏过滤 / 成本分摊 / 指标计算 / 透视汇总
// 红线: 引擎为纯计算,不做 I/O; 数据问题降级并上报,不抛错
// ==========================================

pub mod allocation;
pub mod area_metrics;
pub mod cost_classifier;
pub mod cost_joiner;
pub mod cycle_metrics;
pub mod data_quality;
pub mod feed_components;
pub mod orchestrator;
pub mod pivot;
pub mod price_resolver;
pub mod scope;
pub mod timeframe_filter;

// 重导出核心引擎
pub use area_metrics::AreaMetricsCalculator;
pub use cost_classifier::CostClassifier;
pub use cost_joiner::ConsumptionCostJoiner;
pub use cycle_metrics::CycleMetricsCalculator;
pub use data_quality::DataQualityInspector;
pub use feed_components::FeedComponentSummarizer;
pub use orchestrator::CycleReportOrchestrator;
pub use pivot::{PivotEngine, PivotError, PivotResult};
pub use price_resolver::PriceResolver;
pub use scope::{ItemScope, ScopeResolver};
pub use timeframe_filter::{OccupancyIndex, TimeframeFilter};
