// ==========================================
// 畜牧饲料成本核算引擎 - 饲料构成汇总
// ==========================================
// 职责: 按饲料种类汇总用量、成本、加权均价
// 输出: 按 total_cost 降序 (第 0 项为主饲料)
// ==========================================

use crate::domain::cycle::LivestockCycle;
use crate::domain::farm::FarmDirectory;
use crate::domain::feed::ConsumptionItem;
use crate::domain::metrics::FeedComponentSummary;
use crate::engine::allocation::{percentage, safe_div};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Default, Clone, Copy)]
pub struct FeedComponentSummarizer;

impl FeedComponentSummarizer {
    pub fn new() -> Self {
        Self
    }

    /// 计算饲料构成
    ///
    /// # 参数
    /// - `cycle`: 养殖周期 (头数与周期天数)
    /// - `items`: 已过滤的饲喂记录
    /// - `directory`: 主数据目录 (饲料名称与单位)
    /// - `today`: 进行中周期的截止日
    pub fn calculate(
        &self,
        cycle: &LivestockCycle,
        items: &[ConsumptionItem],
        directory: &FarmDirectory,
        today: NaiveDate,
    ) -> Vec<FeedComponentSummary> {
        // feed_type_id -> (记录数, 用量, 成本)
        let mut grouped: HashMap<&str, (usize, f64, f64)> = HashMap::new();
        for item in items {
            let entry = grouped.entry(item.feed_type_id.as_str()).or_default();
            entry.0 += 1;
            entry.1 += item.quantity;
            entry.2 += item.total_cost;
        }

        let total_cost: f64 = grouped.values().map(|(_, _, c)| c).sum();
        let animals: f64 = cycle.start_details().map(|d| d.count as f64).sum();
        let days = cycle.duration_days(today) as f64;

        let mut summaries: Vec<FeedComponentSummary> = grouped
            .into_iter()
            .map(|(feed_type_id, (record_count, quantity, cost))| {
                let feed_type = directory.feed_type(feed_type_id);
                FeedComponentSummary {
                    feed_type_id: feed_type_id.to_string(),
                    feed_type_name: feed_type
                        .map_or_else(|| feed_type_id.to_string(), |f| f.name.clone()),
                    unit: feed_type.map(|f| f.unit.clone()),
                    record_count,
                    total_quantity: quantity,
                    total_cost: cost,
                    weighted_avg_price: safe_div(cost, quantity),
                    daily_consumption: safe_div(quantity, days),
                    quantity_per_animal: safe_div(quantity, animals),
                    quantity_per_animal_per_day: safe_div(safe_div(quantity, animals), days),
                    percentage_of_total: percentage(cost, total_cost),
                }
            })
            .collect();

        summaries.sort_by(|a, b| {
            b.total_cost
                .partial_cmp(&a.total_cost)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.feed_type_id.cmp(&b.feed_type_id))
        });

        summaries
    }

    /// 主饲料 (成本最高)
    pub fn primary(summaries: &[FeedComponentSummary]) -> Option<&FeedComponentSummary> {
        summaries.first()
    }
}
