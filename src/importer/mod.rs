// ==========================================
// 畜牧饲料成本核算引擎 - 导入层
// ==========================================
// 职责: 外部文件 -> 领域输入 (CycleBatch / 饲喂记录 / 价格档 / 透视配置)
// 支持: CSV, JSON
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;

pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, JsonLoader, RawRecord};

use crate::domain::batch::CycleBatch;
use crate::domain::feed::{ConsumptionRecord, PriceTier};
use crate::domain::pivot::PivotConfig;
use crate::engine::pivot::PivotEngine;
use std::path::Path;
use tracing::info;

/// 加载批量输入 (JSON)
pub fn load_batch_json(path: impl AsRef<Path>) -> ImportResult<CycleBatch> {
    let path = path.as_ref();
    let batch: CycleBatch = JsonLoader.load(path)?;
    validate_batch(&batch)?;
    info!(
        path = %path.display(),
        cycles = batch.cycles.len(),
        consumption = batch.consumption.len(),
        price_tiers = batch.price_tiers.len(),
        "批量输入加载完成"
    );
    Ok(batch)
}

/// 批量输入数值校验 (与 CSV 导入同一规则)
///
/// 行号为数组内位置 (从 1 开始)
fn validate_batch(batch: &CycleBatch) -> ImportResult<()> {
    let mapper = FieldMapper;
    for (index, record) in batch.consumption.iter().enumerate() {
        mapper.check_non_negative(record.quantity, "quantity", index + 1)?;
    }
    for (index, tier) in batch.price_tiers.iter().enumerate() {
        mapper.check_non_negative(tier.price_per_unit, "price_per_unit", index + 1)?;
    }
    Ok(())
}

/// 读取饲喂记录 (CSV)
pub fn read_consumption_csv(path: impl AsRef<Path>) -> ImportResult<Vec<ConsumptionRecord>> {
    let mapper = FieldMapper;
    CsvParser
        .parse_to_raw_records(path.as_ref())?
        .iter()
        .map(|(row_number, row)| mapper.map_consumption(row, *row_number))
        .collect()
}

/// 读取价格档 (CSV)
pub fn read_price_tiers_csv(path: impl AsRef<Path>) -> ImportResult<Vec<PriceTier>> {
    let mapper = FieldMapper;
    CsvParser
        .parse_to_raw_records(path.as_ref())?
        .iter()
        .map(|(row_number, row)| mapper.map_price_tier(row, *row_number))
        .collect()
}

/// 加载并校验透视配置 (JSON)
pub fn load_pivot_config(path: impl AsRef<Path>) -> ImportResult<PivotConfig> {
    let config: PivotConfig = JsonLoader.load(path.as_ref())?;
    PivotEngine::validate(&config)?;
    Ok(config)
}
