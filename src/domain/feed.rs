// ==========================================
// 畜牧饲料成本核算引擎 - 饲料领域模型
// ==========================================
// 职责: 饲料种类 / 价格档 / 饲喂记录 (原始 + 计价后)
// 红线: ConsumptionItem 为派生对象,每次请求重新计算,不落库
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// FeedType - 饲料种类
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedType {
    pub id: String,
    pub name: String,
    pub unit: String, // 计量单位 (kg / t / l)
}

// ==========================================
// PriceTier - 价格档
// ==========================================
// 有效期: valid_from <= date <= valid_to (valid_to 为空表示长期有效)
// supplier_id 为空表示通用价格,适用于任意供应商
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    pub feed_type_id: String,
    #[serde(default)]
    pub supplier_id: Option<String>,
    #[serde(default)]
    pub supplier_name: Option<String>, // 供应商名称 (由数据访问层冗余带出)
    pub price_per_unit: f64,
    pub valid_from: NaiveDate,
    #[serde(default)]
    pub valid_to: Option<NaiveDate>,
}

impl PriceTier {
    /// 判断日期是否落在有效期内 (含两端)
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.valid_from <= date && self.valid_to.map_or(true, |to| date <= to)
    }

    /// 判断价格档是否适用于指定供应商
    ///
    /// - 通用价格档适用于任意供应商 (包括未指定供应商)
    /// - 供应商专属价格档仅适用于同一供应商
    pub fn applies_to_supplier(&self, supplier_id: Option<&str>) -> bool {
        match self.supplier_id.as_deref() {
            None => true,
            Some(own) => supplier_id == Some(own),
        }
    }
}

// ==========================================
// ConsumptionRecord - 原始饲喂记录
// ==========================================
// area_id 与 area_group_id 均为空: 周期级记录 (未指定栏位)
// 仅有 area_group_id: 栏组级记录 (栏组整体计量)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub date: NaiveDate,
    pub feed_type_id: String,
    pub quantity: f64,
    #[serde(default)]
    pub area_id: Option<String>,
    #[serde(default)]
    pub area_group_id: Option<String>,
    #[serde(default)]
    pub supplier_id: Option<String>,
}

// ==========================================
// ConsumptionItem - 计价后饲喂记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionItem {
    pub date: NaiveDate,
    pub feed_type_id: String,
    pub quantity: f64,
    pub area_id: Option<String>,
    pub area_group_id: Option<String>,

    // ===== 计价结果 =====
    pub price_per_unit: Option<f64>, // None = 无有效价格档
    pub total_cost: f64,             // 无价格时为 0

    // ===== 供应商归属 =====
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
}

impl ConsumptionItem {
    /// 是否已解析到价格
    pub fn has_price(&self) -> bool {
        self.price_per_unit.is_some()
    }

    /// 是否为栏组级记录 (仅指定栏组,未指定栏位)
    pub fn is_group_level(&self) -> bool {
        self.area_id.is_none() && self.area_group_id.is_some()
    }

    /// 是否为未分配记录 (栏位、栏组均未指定)
    pub fn is_unassigned(&self) -> bool {
        self.area_id.is_none() && self.area_group_id.is_none()
    }
}
