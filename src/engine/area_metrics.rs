// ==========================================
// 畜牧饲料成本核算引擎 - 栏位指标计算
// ==========================================
// 职责: 按栏位/栏组拆分饲料成本与盈亏,共享成本按动物日分摊
// 输入: 周期 (含占栏明细) + 过滤后饲喂记录 + 成本流水 + 主数据目录
// 输出: AreaMetrics 列表 (每个有效统计范围一条)
// 红线:
// - 栏组整体计量时只用栏组记录,不再累加成员栏位 (防重复)
// - 共享成本按动物日 (头数 × 在栏天数) 分摊,不按饲料成本分摊
// - 未分配饲料成本同样按动物日分摊,保证各范围合计 = 周期饲料成本
// ==========================================

use crate::config::EngineConfig;
use crate::domain::cycle::LivestockCycle;
use crate::domain::farm::FarmDirectory;
use crate::domain::feed::ConsumptionItem;
use crate::domain::metrics::AreaMetrics;
use crate::domain::transaction::CostTransaction;
use crate::domain::types::{OccupancyKind, ScopeKey};
use crate::engine::allocation::{allocate_proportional, percentage, safe_div};
use crate::engine::cost_classifier::CostClassifier;
use crate::engine::scope::{ItemScope, ScopeResolver};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// 单个统计范围的累计值
#[derive(Debug, Default, Clone)]
struct ScopeTotals {
    animal_count: u64,
    animal_days: f64,
    feed_quantity: f64,
    feed_cost: f64,
    purchase_cost: f64,
    sales_revenue: f64,
}

// ==========================================
// AreaMetricsCalculator - 栏位指标计算器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct AreaMetricsCalculator {
    classifier: CostClassifier,
}

impl AreaMetricsCalculator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            classifier: CostClassifier::new(config),
        }
    }

    /// 计算栏位/栏组指标
    ///
    /// # 参数
    /// - `cycle`: 养殖周期 (含占栏明细)
    /// - `items`: 已过滤的饲喂记录
    /// - `costs`: 本周期成本流水
    /// - `directory`: 主数据目录
    /// - `scope_filter`: 仅输出指定范围 (同时从占比分母中剔除其余范围)
    /// - `today`: 进行中周期的截止日
    ///
    /// # 返回
    /// 按 栏位 -> 栏组、名称、id 排序的指标列表
    pub fn calculate(
        &self,
        cycle: &LivestockCycle,
        items: &[ConsumptionItem],
        costs: &[CostTransaction],
        directory: &FarmDirectory,
        scope_filter: Option<&[ScopeKey]>,
        today: NaiveDate,
    ) -> Vec<AreaMetrics> {
        let resolver = ScopeResolver::new(&cycle.details, items, directory);
        let mut totals: BTreeMap<ScopeKey, ScopeTotals> = BTreeMap::new();

        // 1. 占栏明细 -> 头数 / 动物日 / 购销
        for detail in &cycle.details {
            let scope = match resolver.detail_scope(detail) {
                Some(s) => s,
                None => continue,
            };
            match detail.kind {
                OccupancyKind::Start => {
                    if detail.count == 0 {
                        continue;
                    }
                    let entry = totals.entry(scope).or_default();
                    entry.animal_count += detail.count as u64;
                    entry.animal_days += detail.animal_days(cycle.end_date, today);
                    entry.purchase_cost +=
                        detail.buy_price_per_animal.unwrap_or(0.0) * detail.count as f64;
                }
                OccupancyKind::End => {
                    let entry = totals.entry(scope).or_default();
                    entry.sales_revenue +=
                        detail.sell_price_per_animal.unwrap_or(0.0) * detail.count as f64;
                }
            }
        }

        // 2. 饲喂记录 -> 直接饲料成本
        let mut unassigned_quantity = 0.0;
        let mut unassigned_cost = 0.0;
        let mut duplicates = 0usize;
        for item in items {
            match resolver.item_scope(item) {
                ItemScope::Scoped(scope) => {
                    let entry = totals.entry(scope).or_default();
                    entry.feed_quantity += item.quantity;
                    entry.feed_cost += item.total_cost;
                }
                ItemScope::Unassigned => {
                    unassigned_quantity += item.quantity;
                    unassigned_cost += item.total_cost;
                }
                ItemScope::Duplicate => duplicates += 1,
            }
        }

        if totals.is_empty() {
            return Vec::new();
        }

        // 3. 分摊 (按动物日,针对全部范围计算,过滤不影响各范围份额)
        let (transaction_feed_cost, shared_costs) = self.classifier.split_totals(costs);
        let weights: Vec<f64> = totals.values().map(|t| t.animal_days).collect();
        let feed_cost_shares =
            allocate_proportional(unassigned_cost + transaction_feed_cost, &weights);
        let feed_quantity_shares = allocate_proportional(unassigned_quantity, &weights);
        let shared_shares = allocate_proportional(shared_costs, &weights);

        debug!(
            cycle_id = %cycle.id,
            scopes = totals.len(),
            duplicates,
            unassigned_cost,
            shared_costs,
            "栏位指标分摊完成"
        );

        // 4. 组装指标
        let filter: Option<HashSet<&ScopeKey>> = scope_filter.map(|f| f.iter().collect());
        let mut metrics: Vec<AreaMetrics> = totals
            .into_iter()
            .enumerate()
            .filter(|(_, (scope, _))| filter.as_ref().map_or(true, |f| f.contains(scope)))
            .map(|(i, (scope, t))| {
                Self::build_metrics(
                    directory.scope_name(&scope),
                    scope,
                    &t,
                    feed_quantity_shares[i],
                    feed_cost_shares[i],
                    shared_shares[i],
                )
            })
            .collect();

        // 5. 占比 (分母仅含输出范围)
        let in_scope_total: f64 = metrics.iter().map(|m| m.total_feed_cost).sum();
        for m in &mut metrics {
            m.percentage_of_total = percentage(m.total_feed_cost, in_scope_total);
        }

        metrics.sort_by(|a, b| {
            a.scope
                .is_group()
                .cmp(&b.scope.is_group())
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.scope.id().cmp(b.scope.id()))
        });

        metrics
    }

    fn build_metrics(
        name: String,
        scope: ScopeKey,
        totals: &ScopeTotals,
        allocated_quantity: f64,
        allocated_feed_cost: f64,
        shared_cost_allocation: f64,
    ) -> AreaMetrics {
        let animals = totals.animal_count as f64;
        let total_feed_cost = totals.feed_cost + allocated_feed_cost;
        let profit_loss_direct = totals.sales_revenue - totals.purchase_cost - total_feed_cost;
        let profit_loss_full = profit_loss_direct - shared_cost_allocation;

        AreaMetrics {
            scope,
            name,
            animal_count: totals.animal_count,
            animal_days: totals.animal_days,
            total_feed_quantity: totals.feed_quantity + allocated_quantity,
            direct_feed_cost: totals.feed_cost,
            allocated_feed_cost,
            total_feed_cost,
            feed_cost_per_animal: safe_div(total_feed_cost, animals),
            percentage_of_total: 0.0,
            animal_purchase_cost: totals.purchase_cost,
            animal_sales_revenue: totals.sales_revenue,
            shared_cost_allocation,
            profit_loss_direct,
            profit_loss_direct_per_animal: safe_div(profit_loss_direct, animals),
            profit_loss_full,
            profit_loss_full_per_animal: safe_div(profit_loss_full, animals),
        }
    }
}
