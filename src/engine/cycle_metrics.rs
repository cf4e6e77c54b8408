// ==========================================
// 畜牧饲料成本核算引擎 - 周期指标计算
// ==========================================
// 职责: 周期级 KPI (饲料成本 / 料肉比 / 死亡率 / 盈亏)
// 输入: 周期 (含占栏明细) + 过滤后饲喂记录 + 成本流水 + 收入流水 + 主数据目录
// 输出: CycleMetrics
// 红线: 所有比值零分母时为 0; 死亡率暂无数据来源,恒为 0
//       与栏位指标使用同一归属规则 (栏组级计量时剔除成员栏位记录)
// ==========================================

use crate::config::EngineConfig;
use crate::domain::cycle::LivestockCycle;
use crate::domain::farm::FarmDirectory;
use crate::domain::feed::ConsumptionItem;
use crate::domain::metrics::CycleMetrics;
use crate::domain::transaction::{CostTransaction, IncomeTransaction};
use crate::engine::allocation::{percentage, safe_div};
use crate::engine::cost_classifier::CostClassifier;
use crate::engine::scope::{ItemScope, ScopeResolver};
use chrono::NaiveDate;

// ==========================================
// CycleMetricsCalculator - 周期指标计算器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CycleMetricsCalculator {
    classifier: CostClassifier,
}

impl CycleMetricsCalculator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            classifier: CostClassifier::new(config),
        }
    }

    /// 计算周期指标
    ///
    /// # 参数
    /// - `cycle`: 养殖周期 (含占栏明细)
    /// - `items`: 已过滤的饲喂记录
    /// - `costs`: 本周期成本流水
    /// - `incomes`: 本周期收入流水
    /// - `directory`: 主数据目录 (栏位所属栏组)
    /// - `today`: 进行中周期的截止日
    pub fn calculate(
        &self,
        cycle: &LivestockCycle,
        items: &[ConsumptionItem],
        costs: &[CostTransaction],
        incomes: &[IncomeTransaction],
        directory: &FarmDirectory,
        today: NaiveDate,
    ) -> CycleMetrics {
        // 1. 存栏
        let total_animals: u64 = cycle.start_details().map(|d| d.count as u64).sum();
        let cycle_duration_days = cycle.duration_days(today);

        // 2. 饲料成本 (饲喂记录 + 饲料类流水)
        let resolver = ScopeResolver::new(&cycle.details, items, directory);
        let (total_feed_quantity, consumption_feed_cost) = items
            .iter()
            .filter(|i| resolver.item_scope(i) != ItemScope::Duplicate)
            .fold((0.0, 0.0), |(qty, cost), i| (qty + i.quantity, cost + i.total_cost));
        let (transaction_feed_cost, additional_costs) = self.classifier.split_totals(costs);
        let total_feed_cost = consumption_feed_cost + transaction_feed_cost;

        // 3. 增重与料肉比
        let total_weight_gain_kg = Self::weight_gain_kg(cycle);
        let feed_conversion_ratio = safe_div(total_feed_quantity, total_weight_gain_kg);

        // 4. 收入
        let animal_sales_revenue: f64 = cycle
            .end_details()
            .map(|d| d.sell_price_per_animal.unwrap_or(0.0) * d.count as f64)
            .sum();
        let other_income: f64 = incomes.iter().map(|i| i.amount).sum();
        let total_revenue = animal_sales_revenue + other_income;

        // 5. 成本与盈亏
        let animal_purchase_cost: f64 = cycle
            .start_details()
            .map(|d| d.buy_price_per_animal.unwrap_or(0.0) * d.count as f64)
            .sum();
        let total_costs = total_feed_cost + animal_purchase_cost + additional_costs;
        let profit_loss = total_revenue - total_costs;

        CycleMetrics {
            cycle_id: cycle.id.clone(),
            total_animals,
            cycle_duration_days,
            total_feed_quantity,
            consumption_feed_cost,
            transaction_feed_cost,
            total_feed_cost,
            feed_cost_per_animal: safe_div(total_feed_cost, total_animals as f64),
            daily_feed_cost: safe_div(total_feed_cost, cycle_duration_days as f64),
            feed_efficiency: safe_div(total_feed_quantity, total_feed_cost),
            total_weight_gain_kg,
            feed_conversion_ratio,
            mortality_rate: 0.0,
            animal_sales_revenue,
            other_income,
            total_revenue,
            animal_purchase_cost,
            additional_costs,
            total_costs,
            profit_loss,
            profit_margin: percentage(profit_loss, total_revenue),
            profit_per_animal: safe_div(profit_loss, total_animals as f64),
        }
    }

    /// 总增重 = 出栏总活重 - 入栏总活重 (不低于 0)
    ///
    /// 无出栏体重时返回 0 (料肉比随之为 0)
    fn weight_gain_kg(cycle: &LivestockCycle) -> f64 {
        let end_weights: Vec<f64> = cycle.end_details().filter_map(|d| d.total_weight_kg()).collect();
        if end_weights.is_empty() {
            return 0.0;
        }

        let end_total: f64 = end_weights.iter().sum();
        let start_total: f64 = cycle.start_details().filter_map(|d| d.total_weight_kg()).sum();
        (end_total - start_total).max(0.0)
    }
}
