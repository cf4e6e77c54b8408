// ==========================================
// 畜牧饲料成本核算引擎 - 数据质量检查
// ==========================================
// 职责: 缺失价格 / 在栏期间缺失饲喂日 / 未分配饲喂记录
// 输出: DataQualityReport (一等输出,随周期报告返回;
//       未分配记录不属于任何周期,由批量报告单独上报)
// 红线: 数据问题降级处理并上报,不抛错
// ==========================================

use crate::config::EngineConfig;
use crate::domain::cycle::{merge_intervals, DateInterval, LivestockCycle};
use crate::domain::farm::FarmDirectory;
use crate::domain::feed::ConsumptionItem;
use crate::domain::quality::{DataQualityReport, DqIssue, DqSummary};
use crate::domain::types::{DqIssueKind, DqLevel, ScopeKey};
use crate::engine::scope::{ItemScope, ScopeResolver};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

// ==========================================
// DataQualityInspector - 数据质量检查器
// ==========================================
#[derive(Debug, Clone)]
pub struct DataQualityInspector {
    detect_missing_feed_days: bool,
    max_missing_day_issues: usize,
}

impl DataQualityInspector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            detect_missing_feed_days: config.detect_missing_feed_days,
            max_missing_day_issues: config.max_missing_day_issues,
        }
    }

    /// 检查周期数据质量
    ///
    /// # 参数
    /// - `cycle`: 养殖周期 (含占栏明细)
    /// - `items`: 已过滤的饲喂记录
    /// - `directory`: 主数据目录
    /// - `today`: 进行中周期的截止日 (之后的日期不检查缺失饲喂)
    pub fn inspect(
        &self,
        cycle: &LivestockCycle,
        items: &[ConsumptionItem],
        directory: &FarmDirectory,
        today: NaiveDate,
    ) -> DataQualityReport {
        let mut summary = DqSummary {
            total_items: items.len(),
            ..DqSummary::default()
        };
        let mut issues = Vec::new();

        // 1. 缺失价格 / 未分配记录
        for item in items {
            Self::check_item(item, directory, "按动物日分摊", &mut summary, &mut issues);
        }

        // 2. 在栏期间缺失饲喂日
        if self.detect_missing_feed_days {
            let (count, day_issues) = self.missing_feed_days(cycle, items, directory, today);
            summary.missing_feed_days = count;
            issues.extend(day_issues);
        }

        DataQualityReport { summary, issues }
    }

    /// 检查批量中的未分配饲喂记录
    ///
    /// 未指定栏位/栏组的记录无法归属到任何周期 (在栏过滤不保留),
    /// 在批量层面逐条上报,不计入任何周期
    ///
    /// # 参数
    /// - `items`: 整批计价后的记录
    /// - `directory`: 主数据目录
    pub fn inspect_unassigned(
        &self,
        items: &[ConsumptionItem],
        directory: &FarmDirectory,
    ) -> DataQualityReport {
        let mut summary = DqSummary::default();
        let mut issues = Vec::new();

        for item in items.iter().filter(|i| i.is_unassigned()) {
            summary.total_items += 1;
            Self::check_item(item, directory, "未计入任何周期", &mut summary, &mut issues);
        }

        DataQualityReport { summary, issues }
    }

    /// 单条记录: 缺失价格 / 未分配
    fn check_item(
        item: &ConsumptionItem,
        directory: &FarmDirectory,
        unassigned_handling: &str,
        summary: &mut DqSummary,
        issues: &mut Vec<DqIssue>,
    ) {
        if item.has_price() {
            summary.priced_items += 1;
        } else {
            summary.missing_price_items += 1;
            summary.missing_price_quantity += item.quantity;
            issues.push(DqIssue {
                kind: DqIssueKind::MissingPrice,
                level: DqLevel::Warning,
                date: Some(item.date),
                feed_type_id: Some(item.feed_type_id.clone()),
                scope: None,
                message: format!(
                    "饲料 {} 在 {} 无有效价格档,成本按 0 计 (用量 {:.2})",
                    directory.feed_type_name(&item.feed_type_id),
                    item.date,
                    item.quantity
                ),
            });
        }

        if item.is_unassigned() {
            summary.unassigned_items += 1;
            issues.push(DqIssue {
                kind: DqIssueKind::UnassignedConsumption,
                level: DqLevel::Info,
                date: Some(item.date),
                feed_type_id: Some(item.feed_type_id.clone()),
                scope: None,
                message: format!(
                    "{} 的饲喂记录未指定栏位/栏组,{} (用量 {:.2})",
                    item.date, unassigned_handling, item.quantity
                ),
            });
        }
    }

    /// 统计缺失饲喂日
    ///
    /// 未分配记录视为当日所有范围均已饲喂
    ///
    /// # 返回
    /// (缺失 (范围, 日) 总数, 明细问题 (每个范围最多 max_missing_day_issues 条))
    fn missing_feed_days(
        &self,
        cycle: &LivestockCycle,
        items: &[ConsumptionItem],
        directory: &FarmDirectory,
        today: NaiveDate,
    ) -> (usize, Vec<DqIssue>) {
        let resolver = ScopeResolver::new(&cycle.details, items, directory);

        let mut fed_days: HashSet<(ScopeKey, NaiveDate)> = HashSet::new();
        let mut unassigned_days: HashSet<NaiveDate> = HashSet::new();
        for item in items {
            match resolver.item_scope(item) {
                ItemScope::Scoped(scope) => {
                    fed_days.insert((scope, item.date));
                }
                ItemScope::Unassigned => {
                    unassigned_days.insert(item.date);
                }
                ItemScope::Duplicate => {}
            }
        }

        let mut intervals: BTreeMap<ScopeKey, Vec<DateInterval>> = BTreeMap::new();
        for detail in cycle.details.iter().filter(|d| d.is_active_presence()) {
            let scope = match resolver.detail_scope(detail) {
                Some(s) => s,
                None => continue,
            };
            let clipped = detail
                .interval(cycle.end_date, today)
                .and_then(|i| DateInterval::new(i.start, i.end.min(today)));
            if let Some(interval) = clipped {
                intervals.entry(scope).or_default().push(interval);
            }
        }

        let mut total = 0usize;
        let mut issues = Vec::new();
        for (scope, scope_intervals) in intervals {
            let mut reported = 0usize;
            for interval in merge_intervals(scope_intervals) {
                for day in interval.iter_days() {
                    if unassigned_days.contains(&day) || fed_days.contains(&(scope.clone(), day)) {
                        continue;
                    }
                    total += 1;
                    if reported < self.max_missing_day_issues {
                        reported += 1;
                        issues.push(DqIssue {
                            kind: DqIssueKind::MissingFeedDay,
                            level: DqLevel::Info,
                            date: Some(day),
                            feed_type_id: None,
                            scope: Some(scope.clone()),
                            message: format!(
                                "{} 在 {} 有存栏但无饲喂记录",
                                directory.scope_name(&scope),
                                day
                            ),
                        });
                    }
                }
            }
        }

        (total, issues)
    }
}

impl Default for DataQualityInspector {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
