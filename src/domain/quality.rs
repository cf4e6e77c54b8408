// ==========================================
// 畜牧饲料成本核算引擎 - 数据质量报告
// ==========================================
// 红线: 数据质量问题是一等输出,不允许静默丢弃
// ==========================================

use crate::domain::types::{DqIssueKind, DqLevel, ScopeKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DqIssue - 数据质量问题
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqIssue {
    pub kind: DqIssueKind,
    pub level: DqLevel,
    pub date: Option<NaiveDate>,
    pub feed_type_id: Option<String>,
    pub scope: Option<ScopeKey>,
    pub message: String,
}

// ==========================================
// DqSummary - 数据质量汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_items: usize,          // 参与计算的饲喂记录数
    pub priced_items: usize,         // 已计价
    pub missing_price_items: usize,  // 无价格
    pub missing_price_quantity: f64, // 无价格记录的饲料量
    pub missing_feed_days: usize,    // 在栏但无饲喂记录的 (范围, 日) 数
    pub unassigned_items: usize,     // 未指定栏位/栏组
}

// ==========================================
// DataQualityReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub summary: DqSummary,
    pub issues: Vec<DqIssue>,
}

impl DataQualityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn count_of(&self, kind: DqIssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }
}
