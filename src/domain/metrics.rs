// ==========================================
// 畜牧饲料成本核算引擎 - 指标输出对象
// ==========================================
// 职责: 周期指标 / 栏位指标 / 饲料构成
// 红线: 纯数据结构,不含行为; 所有比值零分母时为 0,不出现 NaN/Infinity
// ==========================================

use crate::domain::types::ScopeKey;
use serde::{Deserialize, Serialize};

// ==========================================
// CycleMetrics - 周期指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CycleMetrics {
    pub cycle_id: String,

    // ===== 存栏 =====
    pub total_animals: u64,
    pub cycle_duration_days: i64,

    // ===== 饲料 =====
    pub total_feed_quantity: f64,
    pub consumption_feed_cost: f64, // 饲喂记录计价合计
    pub transaction_feed_cost: f64, // 饲料类成本流水合计
    pub total_feed_cost: f64,
    pub feed_cost_per_animal: f64,
    pub daily_feed_cost: f64,
    pub feed_efficiency: f64, // 饲料量 / 饲料成本

    // ===== 生长 =====
    pub total_weight_gain_kg: f64,
    pub feed_conversion_ratio: f64, // 料肉比 (kg 饲料 / kg 增重)
    pub mortality_rate: f64,        // 预留字段,暂无死亡数据来源,恒为 0

    // ===== 收支 =====
    pub animal_sales_revenue: f64,
    pub other_income: f64,
    pub total_revenue: f64,
    pub animal_purchase_cost: f64,
    pub additional_costs: f64, // 非饲料类成本流水
    pub total_costs: f64,
    pub profit_loss: f64,
    pub profit_margin: f64, // %
    pub profit_per_animal: f64,
}

// ==========================================
// AreaMetrics - 栏位/栏组指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaMetrics {
    pub scope: ScopeKey,
    pub name: String,

    // ===== 存栏 =====
    pub animal_count: u64,
    pub animal_days: f64,

    // ===== 饲料 =====
    pub total_feed_quantity: f64,
    pub direct_feed_cost: f64,    // 本范围饲喂记录
    pub allocated_feed_cost: f64, // 分摊的未分配饲料成本 (周期级记录 + 饲料类流水)
    pub total_feed_cost: f64,
    pub feed_cost_per_animal: f64,
    pub percentage_of_total: f64,

    // ===== 收支 =====
    pub animal_purchase_cost: f64,
    pub animal_sales_revenue: f64,
    pub shared_cost_allocation: f64, // 按动物日分摊的其他成本

    pub profit_loss_direct: f64,
    pub profit_loss_direct_per_animal: f64, // 不含共享成本
    pub profit_loss_full: f64,
    pub profit_loss_full_per_animal: f64, // 含共享成本
}

// ==========================================
// FeedComponentSummary - 饲料构成汇总
// ==========================================
// 按 total_cost 降序,第 0 项即主饲料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedComponentSummary {
    pub feed_type_id: String,
    pub feed_type_name: String,
    pub unit: Option<String>,
    pub record_count: usize,
    pub total_quantity: f64,
    pub total_cost: f64,
    pub weighted_avg_price: f64,
    pub daily_consumption: f64,
    pub quantity_per_animal: f64,
    pub quantity_per_animal_per_day: f64,
    pub percentage_of_total: f64,
}
