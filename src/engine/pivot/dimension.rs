// ==========================================
// 畜牧饲料成本核算引擎 - 透视维度取值
// ==========================================
// 排序: 时间分桶按时间顺序; 分类维度按名称、id; 缺失值排最后
// ==========================================

use crate::domain::pivot::PivotRow;
use crate::domain::types::PivotDimension;
use chrono::{Datelike, NaiveDate};

/// 缺失值展示
pub const MISSING_LABEL: &str = "(ohne)";

/// 维度取值 (派生 Ord 即为输出顺序)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DimensionKey {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    Year(i32),
    Text { label: String, id: String },
    Missing,
}

impl DimensionKey {
    /// 按维度提取取值
    pub fn extract(dimension: PivotDimension, row: &PivotRow) -> Self {
        let date = row.date;
        match dimension {
            PivotDimension::Date => DimensionKey::Day(date),
            PivotDimension::Week => {
                let iso = date.iso_week();
                DimensionKey::Week {
                    year: iso.year(),
                    week: iso.week(),
                }
            }
            PivotDimension::Month => DimensionKey::Month {
                year: date.year(),
                month: date.month(),
            },
            PivotDimension::Quarter => DimensionKey::Quarter {
                year: date.year(),
                quarter: (date.month() - 1) / 3 + 1,
            },
            PivotDimension::Year => DimensionKey::Year(date.year()),
            PivotDimension::FeedType => {
                Self::text(Some(&row.feed_type_id), Some(&row.feed_type_name))
            }
            PivotDimension::Area => Self::text(row.area_id.as_ref(), row.area_name.as_ref()),
            PivotDimension::AreaGroup => {
                Self::text(row.area_group_id.as_ref(), row.area_group_name.as_ref())
            }
            PivotDimension::Supplier => {
                Self::text(row.supplier_id.as_ref(), row.supplier_name.as_ref())
            }
        }
    }

    fn text(id: Option<&String>, label: Option<&String>) -> Self {
        match (id, label) {
            (Some(id), label) => DimensionKey::Text {
                label: label.cloned().unwrap_or_else(|| id.clone()),
                id: id.clone(),
            },
            (None, Some(label)) => DimensionKey::Text {
                label: label.clone(),
                id: label.clone(),
            },
            (None, None) => DimensionKey::Missing,
        }
    }

    /// 展示文本
    pub fn label(&self) -> String {
        match self {
            DimensionKey::Day(date) => date.format("%Y-%m-%d").to_string(),
            DimensionKey::Week { year, week } => format!("{}-W{:02}", year, week),
            DimensionKey::Month { year, month } => format!("{}-{:02}", year, month),
            DimensionKey::Quarter { year, quarter } => format!("{}-Q{}", year, quarter),
            DimensionKey::Year(year) => year.to_string(),
            DimensionKey::Text { label, .. } => label.clone(),
            DimensionKey::Missing => MISSING_LABEL.to_string(),
        }
    }
}

/// 维度组合取值
pub type CompositeKey = Vec<DimensionKey>;

pub fn composite_key(dimensions: &[PivotDimension], row: &PivotRow) -> CompositeKey {
    dimensions
        .iter()
        .map(|d| DimensionKey::extract(*d, row))
        .collect()
}

pub fn labels(key: &[DimensionKey]) -> Vec<String> {
    key.iter().map(DimensionKey::label).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: NaiveDate) -> PivotRow {
        PivotRow {
            date,
            feed_type_id: "F1".to_string(),
            feed_type_name: "Gerste".to_string(),
            area_id: None,
            area_name: None,
            area_group_id: None,
            area_group_name: None,
            supplier_id: Some("S1".to_string()),
            supplier_name: None,
            quantity: 1.0,
            total_cost: 1.0,
            price_per_unit: 1.0,
        }
    }

    #[test]
    fn test_time_bucket_labels() {
        let r = row(NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
        assert_eq!(DimensionKey::extract(PivotDimension::Date, &r).label(), "2024-12-30");
        // ISO 周: 2024-12-30 属于 2025 年第 1 周
        assert_eq!(DimensionKey::extract(PivotDimension::Week, &r).label(), "2025-W01");
        assert_eq!(DimensionKey::extract(PivotDimension::Month, &r).label(), "2024-12");
        assert_eq!(DimensionKey::extract(PivotDimension::Quarter, &r).label(), "2024-Q4");
        assert_eq!(DimensionKey::extract(PivotDimension::Year, &r).label(), "2024");
    }

    #[test]
    fn test_categorical_labels_and_missing() {
        let r = row(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(DimensionKey::extract(PivotDimension::FeedType, &r).label(), "Gerste");
        assert_eq!(DimensionKey::extract(PivotDimension::Supplier, &r).label(), "S1");
        assert_eq!(DimensionKey::extract(PivotDimension::Area, &r), DimensionKey::Missing);
        assert_eq!(DimensionKey::Missing.label(), MISSING_LABEL);
    }

    #[test]
    fn test_months_sort_chronologically_across_years() {
        let mut keys = vec![
            DimensionKey::Month { year: 2024, month: 2 },
            DimensionKey::Month { year: 2023, month: 12 },
            DimensionKey::Month { year: 2024, month: 10 },
        ];
        keys.sort();
        let labels: Vec<String> = keys.iter().map(DimensionKey::label).collect();
        assert_eq!(labels, vec!["2023-12", "2024-02", "2024-10"]);
    }

    #[test]
    fn test_missing_sorts_last() {
        let mut keys = vec![
            DimensionKey::Missing,
            DimensionKey::Text {
                label: "Zucht".to_string(),
                id: "Z".to_string(),
            },
        ];
        keys.sort();
        assert_eq!(keys[1], DimensionKey::Missing);
    }
}
