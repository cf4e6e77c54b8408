// ==========================================
// 畜牧饲料成本核算引擎 - 领域类型定义
// ==========================================
// 职责: 封闭枚举 (占栏类型 / 统计范围 / 数据质量 / 透视维度)
// 红线: 维度与聚合方式必须是封闭枚举,禁止裸字符串
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 占栏明细类型 (Occupancy Kind)
// ==========================================
// Start: 入栏/在栏区间 (决定在栏期间、头数、采购成本)
// End:   出栏/销售记录 (决定销售收入、出栏体重)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyKind {
    Start,
    End,
}

impl Default for OccupancyKind {
    fn default() -> Self {
        OccupancyKind::Start
    }
}

impl fmt::Display for OccupancyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OccupancyKind::Start => write!(f, "start"),
            OccupancyKind::End => write!(f, "end"),
        }
    }
}

// ==========================================
// 统计范围 (Scope Key)
// ==========================================
// 栏位 (Area) 或栏组 (AreaGroup)
// 排序: 先栏位后栏组,同类按 id
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ScopeKey {
    Area(String),
    Group(String),
}

impl ScopeKey {
    pub fn id(&self) -> &str {
        match self {
            ScopeKey::Area(id) | ScopeKey::Group(id) => id,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ScopeKey::Group(_))
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKey::Area(id) => write!(f, "area:{}", id),
            ScopeKey::Group(id) => write!(f, "group:{}", id),
        }
    }
}

// ==========================================
// 数据质量级别 (DQ Level)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Error,   // 错误（结果不可信）
    Warning, // 警告（结果降级,如成本按 0 计）
    Info,    // 提示（仅记录）
}

impl fmt::Display for DqLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DqLevel::Error => write!(f, "ERROR"),
            DqLevel::Warning => write!(f, "WARNING"),
            DqLevel::Info => write!(f, "INFO"),
        }
    }
}

// ==========================================
// 数据质量问题类型 (DQ Issue Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqIssueKind {
    MissingPrice,          // 无有效价格档
    MissingFeedDay,        // 在栏期间无饲喂记录
    UnassignedConsumption, // 饲喂记录未指定栏位/栏组
}

impl fmt::Display for DqIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DqIssueKind::MissingPrice => write!(f, "MISSING_PRICE"),
            DqIssueKind::MissingFeedDay => write!(f, "MISSING_FEED_DAY"),
            DqIssueKind::UnassignedConsumption => write!(f, "UNASSIGNED_CONSUMPTION"),
        }
    }
}

// ==========================================
// 透视维度 (Pivot Dimension)
// ==========================================
// 时间维度按时间顺序排序,分类维度按名称排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotDimension {
    Date,
    Week,
    Month,
    Quarter,
    Year,
    FeedType,
    Area,
    AreaGroup,
    Supplier,
}

impl PivotDimension {
    pub const ALL: [PivotDimension; 9] = [
        PivotDimension::Date,
        PivotDimension::Week,
        PivotDimension::Month,
        PivotDimension::Quarter,
        PivotDimension::Year,
        PivotDimension::FeedType,
        PivotDimension::Area,
        PivotDimension::AreaGroup,
        PivotDimension::Supplier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PivotDimension::Date => "date",
            PivotDimension::Week => "week",
            PivotDimension::Month => "month",
            PivotDimension::Quarter => "quarter",
            PivotDimension::Year => "year",
            PivotDimension::FeedType => "feed_type",
            PivotDimension::Area => "area",
            PivotDimension::AreaGroup => "area_group",
            PivotDimension::Supplier => "supplier",
        }
    }

    /// 是否时间分桶维度
    pub fn is_time_bucket(&self) -> bool {
        matches!(
            self,
            PivotDimension::Date
                | PivotDimension::Week
                | PivotDimension::Month
                | PivotDimension::Quarter
                | PivotDimension::Year
        )
    }
}

impl fmt::Display for PivotDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PivotDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        PivotDimension::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == key)
            .ok_or_else(|| s.to_string())
    }
}

// ==========================================
// 聚合方式 (Pivot Aggregation)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotAggregation {
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

impl PivotAggregation {
    pub fn as_str(&self) -> &'static str {
        match self {
            PivotAggregation::Sum => "sum",
            PivotAggregation::Avg => "avg",
            PivotAggregation::Min => "min",
            PivotAggregation::Max => "max",
            PivotAggregation::Count => "count",
        }
    }
}

impl fmt::Display for PivotAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PivotAggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(PivotAggregation::Sum),
            "avg" | "average" => Ok(PivotAggregation::Avg),
            "min" => Ok(PivotAggregation::Min),
            "max" => Ok(PivotAggregation::Max),
            "count" => Ok(PivotAggregation::Count),
            _ => Err(s.to_string()),
        }
    }
}

// ==========================================
// 透视数值字段 (Pivot Field)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotField {
    Quantity,
    TotalCost,
    PricePerUnit,
}

impl PivotField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PivotField::Quantity => "quantity",
            PivotField::TotalCost => "total_cost",
            PivotField::PricePerUnit => "price_per_unit",
        }
    }
}

impl fmt::Display for PivotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PivotField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quantity" => Ok(PivotField::Quantity),
            "total_cost" => Ok(PivotField::TotalCost),
            "price_per_unit" => Ok(PivotField::PricePerUnit),
            _ => Err(s.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pivot_dimension_from_str() {
        assert_eq!("feed_type".parse::<PivotDimension>(), Ok(PivotDimension::FeedType));
        assert_eq!(" Month ".parse::<PivotDimension>(), Ok(PivotDimension::Month));
        assert_eq!("barn".parse::<PivotDimension>(), Err("barn".to_string()));
    }

    #[test]
    fn test_scope_key_ordering_areas_first() {
        let mut keys = vec![
            ScopeKey::Group("G1".to_string()),
            ScopeKey::Area("B".to_string()),
            ScopeKey::Area("A".to_string()),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                ScopeKey::Area("A".to_string()),
                ScopeKey::Area("B".to_string()),
                ScopeKey::Group("G1".to_string()),
            ]
        );
    }

    #[test]
    fn test_pivot_dimension_serde_name() {
        let json = serde_json::to_string(&PivotDimension::AreaGroup).unwrap();
        assert_eq!(json, "\"area_group\"");
        let err = serde_json::from_str::<PivotDimension>("\"stable\"").unwrap_err();
        assert!(err.to_string().contains("stable"));
    }
}
