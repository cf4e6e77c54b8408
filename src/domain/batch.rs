// ==========================================
// 畜牧饲料成本核算引擎 - 批量输入与报告
// ==========================================
// 职责: 预批量输入 (一次加载,多周期计算) / 周期报告
// 红线: 引擎入口只接受 CycleBatch,不提供逐周期取数回调 (杜绝 N+1)
// ==========================================

use crate::domain::cycle::LivestockCycle;
use crate::domain::farm::{Area, AreaGroup, FarmDirectory};
use crate::domain::feed::{ConsumptionRecord, FeedType, PriceTier};
use crate::domain::metrics::{AreaMetrics, CycleMetrics, FeedComponentSummary};
use crate::domain::quality::DataQualityReport;
use crate::domain::transaction::{CostTransaction, IncomeTransaction};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// CycleBatch - 预批量输入
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleBatch {
    pub cycles: Vec<LivestockCycle>,
    #[serde(default)]
    pub consumption: Vec<ConsumptionRecord>,
    #[serde(default)]
    pub price_tiers: Vec<PriceTier>,
    #[serde(default)]
    pub cost_transactions: Vec<CostTransaction>,
    #[serde(default)]
    pub income_transactions: Vec<IncomeTransaction>,

    // ===== 主数据 =====
    #[serde(default)]
    pub feed_types: Vec<FeedType>,
    #[serde(default)]
    pub areas: Vec<Area>,
    #[serde(default)]
    pub area_groups: Vec<AreaGroup>,
}

impl CycleBatch {
    /// 构建主数据目录
    pub fn directory(&self) -> FarmDirectory {
        FarmDirectory::new(&self.feed_types, &self.areas, &self.area_groups)
    }
}

// ==========================================
// CycleReport - 单周期报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle_id: String,
    pub metrics: CycleMetrics,
    pub areas: Vec<AreaMetrics>,
    pub feed_components: Vec<FeedComponentSummary>,
    pub data_quality: DataQualityReport,
}

// ==========================================
// BatchReport - 批量报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub reference_date: NaiveDate,
    pub reports: Vec<CycleReport>,
    pub unrouted_transactions: usize, // 未指定 cycle_id 或周期不在本批次的流水
    #[serde(default)]
    pub unassigned_consumption: DataQualityReport, // 未指定栏位/栏组的饲喂记录 (不计入任何周期)
}

impl BatchReport {
    pub fn report_for(&self, cycle_id: &str) -> Option<&CycleReport> {
        self.reports.iter().find(|r| r.cycle_id == cycle_id)
    }
}
