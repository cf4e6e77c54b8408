// ==========================================
// 畜牧饲料成本核算引擎 - 透视表模型
// ==========================================
// 职责: 透视配置 (外部可编辑输入) / 扁平行 / 透视结果
// 红线: 配置非法为唯一致命错误,其余数据问题一律降级
// ==========================================

use crate::domain::farm::FarmDirectory;
use crate::domain::feed::ConsumptionItem;
use crate::domain::types::{PivotAggregation, PivotDimension, PivotField};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// PivotValue - 数值列配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotValue {
    pub field: PivotField,
    pub aggregation: PivotAggregation,
    #[serde(default)]
    pub label: Option<String>,
}

impl PivotValue {
    pub fn new(field: PivotField, aggregation: PivotAggregation) -> Self {
        Self {
            field,
            aggregation,
            label: None,
        }
    }

    /// 展示名称 (未配置时为 "field (aggregation)")
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("{} ({})", self.field, self.aggregation))
    }
}

// ==========================================
// PivotConfig - 透视配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PivotConfig {
    #[serde(default)]
    pub rows: Vec<PivotDimension>,
    #[serde(default)]
    pub columns: Vec<PivotDimension>,
    pub values: Vec<PivotValue>,
    #[serde(default)]
    pub show_subtotals: bool,
    #[serde(default = "default_true")]
    pub show_grand_totals: bool,
}

fn default_true() -> bool {
    true
}

// ==========================================
// PivotRow - 透视输入扁平行
// ==========================================
// 由计价后的饲喂记录 + 主数据目录展开而来
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    pub date: NaiveDate,
    pub feed_type_id: String,
    pub feed_type_name: String,
    pub area_id: Option<String>,
    pub area_name: Option<String>,
    pub area_group_id: Option<String>,
    pub area_group_name: Option<String>,
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
    pub quantity: f64,
    pub total_cost: f64,
    pub price_per_unit: f64, // 无价格时为 0
}

impl PivotRow {
    /// 从计价后记录展开
    ///
    /// 栏组取记录自身的栏组,否则取栏位在目录中的所属栏组
    pub fn from_item(item: &ConsumptionItem, directory: &FarmDirectory) -> Self {
        let area_group_id = item
            .area_group_id
            .clone()
            .or_else(|| {
                item.area_id
                    .as_deref()
                    .and_then(|a| directory.group_of(a))
                    .map(str::to_string)
            });

        Self {
            date: item.date,
            feed_type_id: item.feed_type_id.clone(),
            feed_type_name: directory.feed_type_name(&item.feed_type_id).to_string(),
            area_name: item
                .area_id
                .as_deref()
                .map(|a| directory.area_name(a).to_string()),
            area_id: item.area_id.clone(),
            area_group_name: area_group_id
                .as_deref()
                .map(|g| directory.group_name(g).to_string()),
            area_group_id,
            supplier_name: item.supplier_name.clone().or_else(|| item.supplier_id.clone()),
            supplier_id: item.supplier_id.clone(),
            quantity: item.quantity,
            total_cost: item.total_cost,
            price_per_unit: item.price_per_unit.unwrap_or(0.0),
        }
    }

    pub fn value_of(&self, field: PivotField) -> f64 {
        match field {
            PivotField::Quantity => self.quantity,
            PivotField::TotalCost => self.total_cost,
            PivotField::PricePerUnit => self.price_per_unit,
        }
    }
}

// ==========================================
// 透视结果
// ==========================================

/// 列头 = 列维度取值组合 × 数值列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotColumnHeader {
    pub column_keys: Vec<String>,
    pub value_index: usize,
    pub field: PivotField,
    pub aggregation: PivotAggregation,
    pub title: String,
}

/// 透视行: cells 与 column_headers 一一对应 (None 渲染为 "-")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTableRow {
    pub keys: Vec<String>,
    pub cells: Vec<Option<f64>>,
    pub is_subtotal: bool,
    pub level: usize, // 小计行: 共享的行维度前缀长度; 明细行: 行维度数
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTableData {
    pub row_dimensions: Vec<PivotDimension>,
    pub column_dimensions: Vec<PivotDimension>,
    pub column_headers: Vec<PivotColumnHeader>,
    pub rows: Vec<PivotTableRow>,
    pub grand_totals: Option<Vec<Option<f64>>>, // 与 column_headers 对应
    pub value_totals: Option<Vec<Option<f64>>>, // 与 config.values 对应 (跨所有列)
    pub source_row_count: usize,
}

/// 单元格展示格式
pub fn format_cell(cell: Option<f64>) -> String {
    match cell {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}
