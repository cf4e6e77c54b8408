// ==========================================
// 畜牧饲料成本核算引擎 - 引擎编排器
// ==========================================
// 用途: 协调计价、在栏过滤、范围归并与各指标引擎的执行顺序
// 流程: 计价 (整批一次) -> 按周期: 在栏过滤 -> 范围归并 -> 周期/栏位/饲料构成/数据质量
// 红线: 周期指标与栏位指标使用同一份归并后的记录 (栏位合计 == 周期合计)
//       未指定栏位/栏组的饲喂记录不计入任何周期,只在批量报告中上报
// ==========================================

use crate::config::EngineConfig;
use crate::domain::batch::{BatchReport, CycleBatch, CycleReport};
use crate::domain::cycle::LivestockCycle;
use crate::domain::farm::FarmDirectory;
use crate::domain::feed::ConsumptionItem;
use crate::domain::pivot::PivotRow;
use crate::domain::transaction::{CostTransaction, IncomeTransaction};
use crate::engine::{
    AreaMetricsCalculator, ConsumptionCostJoiner, CycleMetricsCalculator, DataQualityInspector,
    FeedComponentSummarizer, OccupancyIndex, PriceResolver, ScopeResolver, TimeframeFilter,
};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

/// 按周期路由后的流水
struct RoutedTransactions<'a> {
    costs: HashMap<&'a str, Vec<CostTransaction>>,
    incomes: HashMap<&'a str, Vec<IncomeTransaction>>,
    unrouted: usize,
}

// ==========================================
// CycleReportOrchestrator - 引擎编排器
// ==========================================
pub struct CycleReportOrchestrator {
    joiner: ConsumptionCostJoiner,
    filter: TimeframeFilter,
    cycle_metrics: CycleMetricsCalculator,
    area_metrics: AreaMetricsCalculator,
    feed_components: FeedComponentSummarizer,
    data_quality: DataQualityInspector,
    tolerance: f64,
}

impl CycleReportOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 引擎配置
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            joiner: ConsumptionCostJoiner::new(),
            filter: TimeframeFilter::new(),
            cycle_metrics: CycleMetricsCalculator::new(config),
            area_metrics: AreaMetricsCalculator::new(config),
            feed_components: FeedComponentSummarizer::new(),
            data_quality: DataQualityInspector::new(config),
            tolerance: config.tolerance,
        }
    }

    /// 批量计算周期报告
    ///
    /// # 参数
    /// - batch: 预批量输入 (全部周期共用一次加载的数据)
    /// - today: 进行中周期的截止日
    ///
    /// # 返回
    /// 批量报告,周期顺序与输入一致
    #[instrument(skip_all, fields(cycles = batch.cycles.len(), today = %today))]
    pub fn run_batch(&self, batch: &CycleBatch, today: NaiveDate) -> BatchReport {
        info!(
            consumption = batch.consumption.len(),
            price_tiers = batch.price_tiers.len(),
            cost_transactions = batch.cost_transactions.len(),
            income_transactions = batch.income_transactions.len(),
            "开始批量核算"
        );

        let directory = batch.directory();

        // ==========================================
        // 步骤1: 整批计价,按日期排序
        // ==========================================
        let resolver = PriceResolver::new(&batch.price_tiers);
        let mut items = self.joiner.join(&batch.consumption, &resolver);
        items.sort_by_key(|i| i.date);

        let unassigned = self.data_quality.inspect_unassigned(&items, &directory);
        if unassigned.summary.unassigned_items > 0 {
            warn!(
                unassigned = unassigned.summary.unassigned_items,
                "存在未指定栏位/栏组的饲喂记录,不计入任何周期"
            );
        }

        // ==========================================
        // 步骤2: 流水按周期路由
        // ==========================================
        let routed = Self::route_transactions(batch);
        if routed.unrouted > 0 {
            warn!(
                unrouted = routed.unrouted,
                "存在未指定周期或周期不在本批次的流水,已忽略"
            );
        }

        // ==========================================
        // 步骤3: 逐周期计算
        // ==========================================
        let reports: Vec<CycleReport> = batch
            .cycles
            .iter()
            .map(|cycle| {
                let costs = routed
                    .costs
                    .get(cycle.id.as_str())
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                let incomes = routed
                    .incomes
                    .get(cycle.id.as_str())
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                self.run_cycle(cycle, &items, costs, incomes, &directory, today)
            })
            .collect();

        info!(
            reports = reports.len(),
            unrouted = routed.unrouted,
            unassigned = unassigned.summary.unassigned_items,
            "批量核算完成"
        );

        BatchReport {
            reference_date: today,
            reports,
            unrouted_transactions: routed.unrouted,
            unassigned_consumption: unassigned,
        }
    }

    /// 单周期计算
    ///
    /// # 参数
    /// - items: 整批计价后的记录 (已按日期排序)
    fn run_cycle(
        &self,
        cycle: &LivestockCycle,
        items: &[ConsumptionItem],
        costs: &[CostTransaction],
        incomes: &[IncomeTransaction],
        directory: &FarmDirectory,
        today: NaiveDate,
    ) -> CycleReport {
        debug!(cycle_id = %cycle.id, details = cycle.details.len(), "计算周期报告");

        // 1. 在栏过滤 (只扫描在栏区间覆盖的日期段)
        let index = OccupancyIndex::build(&cycle.details, directory, cycle.end_date, today);
        let window = Self::date_window(items, &index);
        let retained = self.filter.filter_with_index(window, &index);

        // 2. 范围归并 (栏组级记录存在时去掉成员栏位的重复记录)
        let canonical = ScopeResolver::new(&cycle.details, &retained, directory).canonicalize(&retained);
        if canonical.len() != retained.len() {
            debug!(
                cycle_id = %cycle.id,
                dropped = retained.len() - canonical.len(),
                "栏组级记录与成员栏位记录重复,已去重"
            );
        }

        // 3. 指标
        let metrics = self
            .cycle_metrics
            .calculate(cycle, &canonical, costs, incomes, directory, today);
        let areas = self
            .area_metrics
            .calculate(cycle, &canonical, costs, directory, None, today);
        let feed_components = self
            .feed_components
            .calculate(cycle, &canonical, directory, today);
        let data_quality = self
            .data_quality
            .inspect(cycle, &canonical, directory, today);

        let area_total: f64 = areas.iter().map(|a| a.total_feed_cost).sum();
        if !areas.is_empty() && (area_total - metrics.total_feed_cost).abs() > self.tolerance {
            warn!(
                cycle_id = %cycle.id,
                area_total,
                cycle_total = metrics.total_feed_cost,
                "栏位饲料成本合计与周期合计不一致"
            );
        }

        debug!(
            cycle_id = %cycle.id,
            total_feed_cost = metrics.total_feed_cost,
            areas = areas.len(),
            dq_issues = data_quality.issues.len(),
            "周期报告完成"
        );

        CycleReport {
            cycle_id: cycle.id.clone(),
            metrics,
            areas,
            feed_components,
            data_quality,
        }
    }

    /// 取在栏区间覆盖的记录切片
    fn date_window<'i>(items: &'i [ConsumptionItem], index: &OccupancyIndex<'_>) -> &'i [ConsumptionItem] {
        let intervals = index.all_intervals();
        let (first, last) = match (
            intervals.iter().map(|i| i.start).min(),
            intervals.iter().map(|i| i.end).max(),
        ) {
            (Some(first), Some(last)) => (first, last),
            _ => return &[],
        };

        let lo = items.partition_point(|i| i.date < first);
        let hi = items.partition_point(|i| i.date <= last);
        &items[lo..hi.max(lo)]
    }

    fn route_transactions(batch: &CycleBatch) -> RoutedTransactions<'_> {
        let known: HashSet<&str> = batch.cycles.iter().map(|c| c.id.as_str()).collect();
        let mut routed = RoutedTransactions {
            costs: HashMap::new(),
            incomes: HashMap::new(),
            unrouted: 0,
        };

        for tx in &batch.cost_transactions {
            match tx.cycle_id.as_deref().filter(|id| known.contains(id)) {
                Some(id) => routed.costs.entry(id).or_default().push(tx.clone()),
                None => routed.unrouted += 1,
            }
        }
        for tx in &batch.income_transactions {
            match tx.cycle_id.as_deref().filter(|id| known.contains(id)) {
                Some(id) => routed.incomes.entry(id).or_default().push(tx.clone()),
                None => routed.unrouted += 1,
            }
        }

        routed
    }

    /// 透视输入: 整批计价后的扁平行
    pub fn pivot_rows(&self, batch: &CycleBatch) -> Vec<PivotRow> {
        let directory = batch.directory();
        let resolver = PriceResolver::new(&batch.price_tiers);
        self.joiner
            .join(&batch.consumption, &resolver)
            .iter()
            .map(|item| PivotRow::from_item(item, &directory))
            .collect()
    }
}

impl Default for CycleReportOrchestrator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
