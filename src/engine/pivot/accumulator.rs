use crate::domain::types::PivotAggregation;

/// 聚合运行状态
///
/// 读取时再根据聚合方式计算结果 (avg = sum / count)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    sum: f64,
    count: u64,
    min: Option<f64>,
    max: Option<f64>,
}

impl Accumulator {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// 按聚合方式取值
    ///
    /// - sum: 无数据为 0
    /// - avg: 无数据为 0
    /// - min/max: 无数据为 None (展示为 "-")
    /// - count: 参与的原始行数
    pub fn value(&self, aggregation: PivotAggregation) -> Option<f64> {
        match aggregation {
            PivotAggregation::Sum => Some(self.sum),
            PivotAggregation::Avg => Some(if self.count == 0 {
                0.0
            } else {
                self.sum / self.count as f64
            }),
            PivotAggregation::Min => self.min,
            PivotAggregation::Max => self.max,
            PivotAggregation::Count => Some(self.count as f64),
        }
    }
}
