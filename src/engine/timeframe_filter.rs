// ==========================================
// 畜牧饲料成本核算引擎 - 在栏时间过滤
// ==========================================
// 职责: 仅保留饲喂日期落在动物实际在栏区间内的记录
// 输入: 计价后饲喂记录 + 占栏明细 + 周期结束日
// 输出: 过滤后的饲喂记录 (幂等)
// 红线: 过滤是正确性要求,不是可选筛选; 同一栏位的多段区间必须全部检查
// ==========================================

use crate::domain::cycle::{merge_intervals, DateInterval, OccupancyDetail};
use crate::domain::farm::FarmDirectory;
use crate::domain::feed::ConsumptionItem;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// OccupancyIndex - 在栏区间索引
// ==========================================
// 每次调用构建一次: 栏位/栏组 id -> 合并后的有效区间
// 匹配规则:
// - 栏位记录: 栏位自身区间 或 所属栏组区间
// - 栏组记录: 栏组自身区间 或 任一成员栏位区间
// - 未分配记录: 不匹配任何区间 (无法归属到周期,由批量数据质量报告上报)
#[derive(Debug, Clone)]
pub struct OccupancyIndex<'a> {
    directory: &'a FarmDirectory,
    by_area: HashMap<String, Vec<DateInterval>>,
    by_group: HashMap<String, Vec<DateInterval>>,
    by_group_members: HashMap<String, Vec<DateInterval>>,
    detail_groups: HashMap<String, String>, // 占栏明细上登记的栏位 -> 栏组
    all: Vec<DateInterval>,
}

impl<'a> OccupancyIndex<'a> {
    /// 构建索引
    ///
    /// # 参数
    /// - `details`: 占栏明细 (仅 Start 且头数 > 0 的明细生效)
    /// - `directory`: 主数据目录 (栏位所属栏组)
    /// - `cycle_end`: 周期结束日 (进行中周期为 None)
    /// - `today`: 进行中周期的截止日
    pub fn build(
        details: &[OccupancyDetail],
        directory: &'a FarmDirectory,
        cycle_end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        let mut by_area: HashMap<String, Vec<DateInterval>> = HashMap::new();
        let mut by_group: HashMap<String, Vec<DateInterval>> = HashMap::new();
        let mut detail_groups: HashMap<String, String> = HashMap::new();
        let mut all = Vec::new();

        for detail in details.iter().filter(|d| d.is_active_presence()) {
            let interval = match detail.interval(cycle_end, today) {
                Some(i) => i,
                None => continue,
            };

            match (&detail.area_id, &detail.area_group_id) {
                (Some(area), group) => {
                    by_area.entry(area.clone()).or_default().push(interval);
                    if let Some(group) = group {
                        detail_groups.insert(area.clone(), group.clone());
                    }
                }
                (None, Some(group)) => {
                    by_group.entry(group.clone()).or_default().push(interval);
                }
                (None, None) => {}
            }
            all.push(interval);
        }

        let mut index = Self {
            directory,
            by_area,
            by_group,
            by_group_members: HashMap::new(),
            detail_groups,
            all: merge_intervals(all),
        };

        // 成员栏位区间归集到栏组
        let mut by_group_members: HashMap<String, Vec<DateInterval>> = HashMap::new();
        for (area, intervals) in &index.by_area {
            if let Some(group) = index.group_of(area) {
                by_group_members
                    .entry(group.to_string())
                    .or_default()
                    .extend(intervals.iter().copied());
            }
        }

        index.by_group_members = by_group_members
            .into_iter()
            .map(|(g, v)| (g, merge_intervals(v)))
            .collect();
        index.by_area = std::mem::take(&mut index.by_area)
            .into_iter()
            .map(|(a, v)| (a, merge_intervals(v)))
            .collect();
        index.by_group = std::mem::take(&mut index.by_group)
            .into_iter()
            .map(|(g, v)| (g, merge_intervals(v)))
            .collect();

        index
    }

    /// 栏位所属栏组 (占栏明细登记优先,其次主数据目录)
    pub fn group_of(&self, area_id: &str) -> Option<&str> {
        self.detail_groups
            .get(area_id)
            .map(String::as_str)
            .or_else(|| self.directory.group_of(area_id))
    }

    /// 判断记录是否落在任一匹配区间内
    pub fn covers(&self, item: &ConsumptionItem) -> bool {
        let date = item.date;

        if let Some(area) = item.area_id.as_deref() {
            if Self::any_contains(self.by_area.get(area), date) {
                return true;
            }
            let group = item.area_group_id.as_deref().or_else(|| self.group_of(area));
            return group.map_or(false, |g| Self::any_contains(self.by_group.get(g), date));
        }

        match item.area_group_id.as_deref() {
            Some(group) => {
                Self::any_contains(self.by_group.get(group), date)
                    || Self::any_contains(self.by_group_members.get(group), date)
            }
            None => false,
        }
    }

    /// 周期内全部有效区间 (已合并)
    pub fn all_intervals(&self) -> &[DateInterval] {
        &self.all
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    fn any_contains(intervals: Option<&Vec<DateInterval>>, date: NaiveDate) -> bool {
        intervals.map_or(false, |list| list.iter().any(|i| i.contains(date)))
    }
}

// ==========================================
// TimeframeFilter - 在栏时间过滤器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeframeFilter;

impl TimeframeFilter {
    pub fn new() -> Self {
        Self
    }

    /// 过滤饲喂记录
    ///
    /// # 参数
    /// - `items`: 计价后饲喂记录
    /// - `details`: 占栏明细
    /// - `directory`: 主数据目录
    /// - `cycle_end`: 周期结束日
    /// - `today`: 进行中周期的截止日
    ///
    /// # 返回
    /// 落在在栏区间内的记录 (保持输入顺序)
    pub fn filter(
        &self,
        items: &[ConsumptionItem],
        details: &[OccupancyDetail],
        directory: &FarmDirectory,
        cycle_end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Vec<ConsumptionItem> {
        let index = OccupancyIndex::build(details, directory, cycle_end, today);
        self.filter_with_index(items.iter(), &index)
    }

    /// 使用已构建的索引过滤
    pub fn filter_with_index<'i>(
        &self,
        items: impl IntoIterator<Item = &'i ConsumptionItem>,
        index: &OccupancyIndex<'_>,
    ) -> Vec<ConsumptionItem> {
        let mut total = 0usize;
        let retained: Vec<ConsumptionItem> = items
            .into_iter()
            .inspect(|_| total += 1)
            .filter(|item| index.covers(item))
            .cloned()
            .collect();

        debug!(
            total,
            retained = retained.len(),
            dropped = total - retained.len(),
            "在栏时间过滤完成"
        );

        retained
    }
}
