// ==========================================
// 畜牧饲料成本核算引擎 - 字段映射器
// ==========================================
// 职责: 原始 CSV 行 -> 饲喂记录 / 价格档 + 类型转换
// 红线: 用量与单价不得为负; 必填字段缺失即报错并带行号
// ==========================================

use crate::domain::feed::{ConsumptionRecord, PriceTier};
use crate::importer::error::{ImportError, ImportResult};
use chrono::NaiveDate;
use std::collections::HashMap;

pub struct FieldMapper;

impl FieldMapper {
    /// 映射饲喂记录
    ///
    /// 列: date, feed_type_id, quantity, area_id?, area_group_id?, supplier_id?
    pub fn map_consumption(
        &self,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> ImportResult<ConsumptionRecord> {
        let quantity = self.require_f64(row, "quantity", row_number)?;
        self.check_non_negative(quantity, "quantity", row_number)?;

        Ok(ConsumptionRecord {
            date: self.require_date(row, "date", row_number)?,
            feed_type_id: self.require_string(row, "feed_type_id", row_number)?,
            quantity,
            area_id: self.get_string(row, "area_id"),
            area_group_id: self.get_string(row, "area_group_id"),
            supplier_id: self.get_string(row, "supplier_id"),
        })
    }

    /// 映射价格档
    ///
    /// 列: feed_type_id, price_per_unit, valid_from, valid_to?, supplier_id?, supplier_name?
    pub fn map_price_tier(
        &self,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> ImportResult<PriceTier> {
        let price_per_unit = self.require_f64(row, "price_per_unit", row_number)?;
        self.check_non_negative(price_per_unit, "price_per_unit", row_number)?;

        Ok(PriceTier {
            feed_type_id: self.require_string(row, "feed_type_id", row_number)?,
            supplier_id: self.get_string(row, "supplier_id"),
            supplier_name: self.get_string(row, "supplier_name"),
            price_per_unit,
            valid_from: self.require_date(row, "valid_from", row_number)?,
            valid_to: self.parse_date(row, "valid_to", row_number)?,
        })
    }

    /// 提取字符串字段,支持别名列名
    fn get_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        let aliases: &[&str] = match key {
            "date" => &["date", "datum", "consumption_date"],
            "feed_type_id" => &["feed_type_id", "feed_type", "futtermittel"],
            "quantity" => &["quantity", "menge"],
            "area_id" => &["area_id", "area", "stall"],
            "area_group_id" => &["area_group_id", "area_group", "stallgruppe"],
            "supplier_id" => &["supplier_id", "supplier", "lieferant"],
            "price_per_unit" => &["price_per_unit", "price", "preis"],
            "valid_from" => &["valid_from", "gueltig_ab"],
            "valid_to" => &["valid_to", "gueltig_bis"],
            _ => &[],
        };

        std::iter::once(key)
            .chain(aliases.iter().copied())
            .filter_map(|alias| row.get(alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn require_string(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<String> {
        self.get_string(row, key)
            .ok_or_else(|| ImportError::MissingField {
                row: row_number,
                field: key.to_string(),
            })
    }

    /// 解析浮点数 (兼容逗号小数点: "1,25")
    fn require_f64(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<f64> {
        let value = self.require_string(row, key, row_number)?;
        let normalized = if value.contains('.') {
            value.clone()
        } else {
            value.replace(',', ".")
        };

        normalized
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ImportError::TypeConversionError {
                row: row_number,
                field: key.to_string(),
                message: format!("无法解析为浮点数: {}", value),
            })
    }

    /// 解析日期 (YYYY-MM-DD, 兼容 YYYYMMDD 与 DD.MM.YYYY)
    fn parse_date(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Option<NaiveDate>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => ["%Y-%m-%d", "%Y%m%d", "%d.%m.%Y"]
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(&value, fmt).ok())
                .map(Some)
                .ok_or_else(|| ImportError::DateFormatError {
                    row: row_number,
                    field: key.to_string(),
                    value: value.clone(),
                }),
        }
    }

    fn require_date(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<NaiveDate> {
        self.parse_date(row, key, row_number)?
            .ok_or_else(|| ImportError::MissingField {
                row: row_number,
                field: key.to_string(),
            })
    }

    /// 数值不得为负 (CSV 与 JSON 输入共用)
    pub fn check_non_negative(&self, value: f64, field: &str, row_number: usize) -> ImportResult<()> {
        if value < 0.0 {
            return Err(ImportError::ValueRangeError {
                row: row_number,
                field: field.to_string(),
                value,
            });
        }
        Ok(())
    }
}
