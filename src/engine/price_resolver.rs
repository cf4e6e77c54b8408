// ==========================================
// 畜牧饲料成本核算引擎 - 价格解析器
// ==========================================
// 职责: 按饲料种类 / 日期 / 供应商解析有效价格档
// 输入: 价格档列表 (构造时按饲料种类索引一次)
// 输出: 有效价格档 或 None (无价格不是错误,由调用方记录数据质量问题)
// ==========================================

use crate::domain::feed::PriceTier;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;

// ==========================================
// PriceResolver - 价格解析器
// ==========================================
// 选择规则:
// 1. 饲料种类一致
// 2. 供应商专属价格档仅适用于同一供应商,通用价格档适用于任意供应商
// 3. valid_from <= date <= valid_to (valid_to 为空视为无穷)
// 4. 多个匹配时取 valid_from 最晚者
// 5. valid_from 相同: 专属优先于通用 -> valid_to 更晚 (开放视为最晚) -> 输入中靠后者
pub struct PriceResolver<'a> {
    // feed_type_id -> (输入序号, 价格档), 按 valid_from 降序
    tiers_by_feed_type: HashMap<&'a str, Vec<(usize, &'a PriceTier)>>,
}

impl<'a> PriceResolver<'a> {
    /// 构造并建立索引
    pub fn new(tiers: &'a [PriceTier]) -> Self {
        let mut tiers_by_feed_type: HashMap<&'a str, Vec<(usize, &'a PriceTier)>> =
            HashMap::new();

        for (position, tier) in tiers.iter().enumerate() {
            tiers_by_feed_type
                .entry(tier.feed_type_id.as_str())
                .or_default()
                .push((position, tier));
        }

        for candidates in tiers_by_feed_type.values_mut() {
            candidates.sort_by(|a, b| Self::precedence(b, a));
        }

        Self { tiers_by_feed_type }
    }

    /// 解析有效价格档
    ///
    /// # 参数
    /// - `feed_type_id`: 饲料种类
    /// - `date`: 饲喂日期
    /// - `supplier_id`: 供应商 (可选)
    ///
    /// # 返回
    /// 优先级最高的有效价格档; 无匹配时返回 None
    pub fn resolve(
        &self,
        feed_type_id: &str,
        date: NaiveDate,
        supplier_id: Option<&str>,
    ) -> Option<&'a PriceTier> {
        // 候选已按优先级降序,第一个满足条件的即为结果
        self.tiers_by_feed_type
            .get(feed_type_id)?
            .iter()
            .map(|(_, tier)| *tier)
            .find(|tier| tier.is_valid_on(date) && tier.applies_to_supplier(supplier_id))
    }

    /// 价格档数量
    pub fn tier_count(&self) -> usize {
        self.tiers_by_feed_type.values().map(Vec::len).sum()
    }

    /// 优先级比较 (Greater = 优先)
    fn precedence(a: &(usize, &PriceTier), b: &(usize, &PriceTier)) -> Ordering {
        let (pos_a, tier_a) = a;
        let (pos_b, tier_b) = b;

        tier_a
            .valid_from
            .cmp(&tier_b.valid_from)
            .then_with(|| {
                tier_a
                    .supplier_id
                    .is_some()
                    .cmp(&tier_b.supplier_id.is_some())
            })
            .then_with(|| match (tier_a.valid_to, tier_b.valid_to) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(x), Some(y)) => x.cmp(&y),
            })
            .then_with(|| pos_a.cmp(pos_b))
    }
}
