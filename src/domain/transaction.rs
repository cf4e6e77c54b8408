// ==========================================
// 畜牧饲料成本核算引擎 - 收支流水
// ==========================================
// 职责: 成本流水 / 收入流水
// 说明: cycle_id 用于批量计算时把流水路由到对应周期
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// CostTransaction - 成本流水
// ==========================================
// category 为饲料类目 (默认 "Futterkosten", 不区分大小写) 时计入饲料成本,
// 其余类目计入其他成本 (共享成本,按动物日分摊)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostTransaction {
    #[serde(default)]
    pub cycle_id: Option<String>,
    pub amount: f64,
    pub transaction_date: NaiveDate,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ==========================================
// IncomeTransaction - 收入流水
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeTransaction {
    #[serde(default)]
    pub cycle_id: Option<String>,
    pub amount: f64,
    pub transaction_date: NaiveDate,
    pub income_type: String,
    #[serde(default)]
    pub description: Option<String>,
}
