// ==========================================
// 畜牧饲料成本核算引擎 - 透视引擎
// ==========================================
// 职责: 按配置的行/列维度对饲喂扁平行做交叉汇总
// 输入: PivotRow 列表 + PivotConfig
// 输出: PivotTableData (列头 / 行 / 小计 / 总计)
// 红线: 相同输入多次调用输出完全一致 (BTreeMap 排序)
// ==========================================

pub mod accumulator;
pub mod dimension;
pub mod error;

pub use accumulator::Accumulator;
pub use dimension::{composite_key, labels, CompositeKey, DimensionKey, MISSING_LABEL};
pub use error::{PivotError, PivotResult};

use crate::domain::pivot::{
    PivotColumnHeader, PivotConfig, PivotRow, PivotTableData, PivotTableRow, PivotValue,
};
use crate::domain::types::{PivotAggregation, PivotDimension, PivotField};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, instrument};

/// (行取值, 列取值) -> 每个数值列一个累加器
type CellMap = BTreeMap<(CompositeKey, CompositeKey), Vec<Accumulator>>;

impl PivotConfig {
    /// 从 JSON 解析并校验透视配置
    pub fn from_json(json: &str) -> PivotResult<Self> {
        let config: PivotConfig =
            serde_json::from_str(json).map_err(|e| PivotError::InvalidConfig(e.to_string()))?;
        PivotEngine::validate(&config)?;
        Ok(config)
    }

    /// 从简写解析透视配置 (命令行使用)
    ///
    /// 格式: `rows=feed_type,month;columns=area;values=quantity:sum,total_cost:avg;subtotals`
    pub fn from_inline(expr: &str) -> PivotResult<Self> {
        let mut config = PivotConfig {
            show_grand_totals: true,
            ..PivotConfig::default()
        };

        for part in expr.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            match key.trim() {
                "rows" => config.rows = parse_dimensions(value)?,
                "columns" => config.columns = parse_dimensions(value)?,
                "values" => {
                    config.values = split_list(value)
                        .map(parse_value)
                        .collect::<PivotResult<Vec<_>>>()?
                }
                "subtotals" => config.show_subtotals = true,
                "no_totals" => config.show_grand_totals = false,
                other => return Err(PivotError::InvalidConfig(format!("未知的配置项: {}", other))),
            }
        }

        PivotEngine::validate(&config)?;
        Ok(config)
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// 解析逗号分隔的维度列表
pub fn parse_dimensions(list: &str) -> PivotResult<Vec<PivotDimension>> {
    split_list(list)
        .map(|name| name.parse().map_err(PivotError::UnknownDimension))
        .collect()
}

/// 解析 `field:aggregation` (聚合缺省为 sum)
pub fn parse_value(expr: &str) -> PivotResult<PivotValue> {
    let (field, aggregation) = expr.split_once(':').unwrap_or((expr, "sum"));
    let field: PivotField = field.parse().map_err(PivotError::UnknownValueField)?;
    let aggregation: PivotAggregation =
        aggregation.parse().map_err(PivotError::UnknownAggregation)?;
    Ok(PivotValue::new(field, aggregation))
}

// ==========================================
// PivotEngine - 透视引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct PivotEngine;

impl PivotEngine {
    pub fn new() -> Self {
        Self
    }

    /// 校验配置
    ///
    /// 非法: values 为空 / 同一维度重复出现 (含行列两侧同时使用)
    pub fn validate(config: &PivotConfig) -> PivotResult<()> {
        if config.values.is_empty() {
            return Err(PivotError::NoValues);
        }

        let mut seen: HashSet<PivotDimension> = HashSet::new();
        for dimension in config.rows.iter().chain(config.columns.iter()) {
            if !seen.insert(*dimension) {
                return Err(PivotError::DuplicateDimension(dimension.to_string()));
            }
        }

        Ok(())
    }

    /// 生成透视表
    ///
    /// # 参数
    /// - `rows`: 扁平行
    /// - `config`: 透视配置
    ///
    /// # 返回
    /// - Ok(PivotTableData): 空输入返回空表 (无行,总计为 0)
    /// - Err(PivotError): 配置非法
    #[instrument(skip_all, fields(source_rows = rows.len()))]
    pub fn generate(&self, rows: &[PivotRow], config: &PivotConfig) -> PivotResult<PivotTableData> {
        Self::validate(config)?;

        let value_count = config.values.len();
        let subtotal_depth = if config.show_subtotals && config.rows.len() >= 2 {
            config.rows.len() - 1
        } else {
            0
        };

        let mut row_keys: BTreeSet<CompositeKey> = BTreeSet::new();
        let mut column_keys: BTreeSet<CompositeKey> = BTreeSet::new();
        let mut cells: CellMap = BTreeMap::new();
        let mut subtotals: CellMap = BTreeMap::new();
        let mut column_totals: BTreeMap<CompositeKey, Vec<Accumulator>> = BTreeMap::new();
        let mut value_totals = vec![Accumulator::default(); value_count];

        // 1. 累加
        for row in rows {
            let row_key = composite_key(&config.rows, row);
            let column_key = composite_key(&config.columns, row);
            let values: Vec<f64> = config.values.iter().map(|v| row.value_of(v.field)).collect();

            push_all(
                cells
                    .entry((row_key.clone(), column_key.clone()))
                    .or_insert_with(|| vec![Accumulator::default(); value_count]),
                &values,
            );

            for depth in 1..=subtotal_depth {
                push_all(
                    subtotals
                        .entry((row_key[..depth].to_vec(), column_key.clone()))
                        .or_insert_with(|| vec![Accumulator::default(); value_count]),
                    &values,
                );
            }

            push_all(
                column_totals
                    .entry(column_key.clone())
                    .or_insert_with(|| vec![Accumulator::default(); value_count]),
                &values,
            );
            push_all(&mut value_totals, &values);

            row_keys.insert(row_key);
            column_keys.insert(column_key);
        }

        // 无列维度时保留一个隐式列
        if column_keys.is_empty() {
            column_keys.insert(Vec::new());
        }
        let column_keys: Vec<CompositeKey> = column_keys.into_iter().collect();

        // 2. 列头
        let column_headers = build_headers(&column_keys, &config.values);

        // 3. 行 (含小计)
        let row_keys: Vec<CompositeKey> = row_keys.into_iter().collect();
        let mut table_rows = Vec::with_capacity(row_keys.len());
        for (index, row_key) in row_keys.iter().enumerate() {
            table_rows.push(PivotTableRow {
                keys: labels(row_key),
                cells: read_cells(&cells, row_key, &column_keys, &config.values),
                is_subtotal: false,
                level: config.rows.len(),
            });

            let next = row_keys.get(index + 1);
            for depth in (1..=subtotal_depth).rev() {
                let prefix = &row_key[..depth];
                let closes = next.map_or(true, |n| n[..depth] != *prefix);
                if !closes {
                    continue;
                }
                let mut keys = labels(prefix);
                keys.resize(config.rows.len(), String::new());
                table_rows.push(PivotTableRow {
                    keys,
                    cells: read_cells(&subtotals, prefix, &column_keys, &config.values),
                    is_subtotal: true,
                    level: depth,
                });
            }
        }

        // 4. 总计
        let (grand_totals, value_totals) = if config.show_grand_totals {
            let grand: Vec<Option<f64>> = column_keys
                .iter()
                .flat_map(|column_key| {
                    let accumulators = column_totals.get(column_key);
                    config.values.iter().enumerate().map(move |(i, value)| {
                        accumulators
                            .map(|a| a[i])
                            .unwrap_or_default()
                            .value(value.aggregation)
                    })
                })
                .collect();
            let totals: Vec<Option<f64>> = config
                .values
                .iter()
                .zip(value_totals.iter())
                .map(|(value, acc)| acc.value(value.aggregation))
                .collect();
            (Some(grand), Some(totals))
        } else {
            (None, None)
        };

        debug!(
            rows = table_rows.len(),
            columns = column_headers.len(),
            "透视表生成完成"
        );

        Ok(PivotTableData {
            row_dimensions: config.rows.clone(),
            column_dimensions: config.columns.clone(),
            column_headers,
            rows: table_rows,
            grand_totals,
            value_totals,
            source_row_count: rows.len(),
        })
    }
}

fn push_all(accumulators: &mut [Accumulator], values: &[f64]) {
    for (acc, value) in accumulators.iter_mut().zip(values) {
        acc.push(*value);
    }
}

fn build_headers(column_keys: &[CompositeKey], values: &[PivotValue]) -> Vec<PivotColumnHeader> {
    let mut headers = Vec::with_capacity(column_keys.len() * values.len());
    for column_key in column_keys {
        let column_labels = labels(column_key);
        for (value_index, value) in values.iter().enumerate() {
            let mut title_parts = column_labels.clone();
            title_parts.push(value.display_label());
            headers.push(PivotColumnHeader {
                column_keys: column_labels.clone(),
                value_index,
                field: value.field,
                aggregation: value.aggregation,
                title: title_parts.join(" / "),
            });
        }
    }
    headers
}

/// 按列头顺序读出一行单元格 (无数据的组合按空累加器取值)
fn read_cells(
    map: &CellMap,
    row_key: &[DimensionKey],
    column_keys: &[CompositeKey],
    values: &[PivotValue],
) -> Vec<Option<f64>> {
    let mut cells = Vec::with_capacity(column_keys.len() * values.len());
    for column_key in column_keys {
        let accumulators = map.get(&(row_key.to_vec(), column_key.clone()));
        for (i, value) in values.iter().enumerate() {
            let acc = accumulators.map(|a| a[i]).unwrap_or_default();
            cells.push(acc.value(value.aggregation));
        }
    }
    cells
}
