// ==========================================
// 畜牧饲料成本核算引擎 - 饲喂记录计价
// ==========================================
// 职责: 为每条原始饲喂记录解析价格并计算成本
// 输入: 原始饲喂记录 + 价格解析器
// 输出: ConsumptionItem (保持输入顺序)
// 红线: 纯转换,无价格时成本按 0 计,不报错
// ==========================================

use crate::domain::feed::{ConsumptionItem, ConsumptionRecord, PriceTier};
use crate::engine::price_resolver::PriceResolver;
use tracing::{debug, warn};

// ==========================================
// ConsumptionCostJoiner - 计价器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsumptionCostJoiner;

impl ConsumptionCostJoiner {
    pub fn new() -> Self {
        Self
    }

    /// 批量计价
    ///
    /// # 参数
    /// - `records`: 原始饲喂记录
    /// - `resolver`: 价格解析器
    ///
    /// # 返回
    /// 计价后的记录,顺序与输入一致
    pub fn join(
        &self,
        records: &[ConsumptionRecord],
        resolver: &PriceResolver<'_>,
    ) -> Vec<ConsumptionItem> {
        let items: Vec<ConsumptionItem> = records
            .iter()
            .map(|record| self.join_single(record, resolver))
            .collect();

        let unpriced = items.iter().filter(|i| !i.has_price()).count();
        if unpriced > 0 {
            warn!(
                total = items.len(),
                unpriced, "部分饲喂记录无有效价格档,成本按 0 计"
            );
        } else {
            debug!(total = items.len(), "饲喂记录计价完成");
        }

        items
    }

    /// 便捷入口: 直接使用价格档列表
    pub fn join_with_tiers(
        &self,
        records: &[ConsumptionRecord],
        tiers: &[PriceTier],
    ) -> Vec<ConsumptionItem> {
        let resolver = PriceResolver::new(tiers);
        self.join(records, &resolver)
    }

    /// 单条计价
    pub fn join_single(
        &self,
        record: &ConsumptionRecord,
        resolver: &PriceResolver<'_>,
    ) -> ConsumptionItem {
        let tier = resolver.resolve(
            &record.feed_type_id,
            record.date,
            record.supplier_id.as_deref(),
        );

        let price_per_unit = tier.map(|t| t.price_per_unit);
        let total_cost = price_per_unit.map_or(0.0, |p| record.quantity * p);

        // 供应商归属: 优先取价格档上的供应商,否则保留记录自带的供应商
        let supplier_id = tier
            .and_then(|t| t.supplier_id.clone())
            .or_else(|| record.supplier_id.clone());
        let supplier_name = tier.and_then(|t| t.supplier_name.clone());

        ConsumptionItem {
            date: record.date,
            feed_type_id: record.feed_type_id.clone(),
            quantity: record.quantity,
            area_id: record.area_id.clone(),
            area_group_id: record.area_group_id.clone(),
            price_per_unit,
            total_cost,
            supplier_id,
            supplier_name,
        }
    }
}
