// ==========================================
// 畜牧饲料成本核算引擎 - 统计范围归属
// ==========================================
// 职责: 确定饲喂记录 / 占栏明细归属的统计范围 (栏位或栏组)
// 规则:
// - 栏组存在栏组级饲喂记录 (栏组整体计量) 时,栏组为统计范围,
//   成员栏位并入栏组,成员栏位自身的饲喂记录视为重复计量并剔除
// - 栏位无自身在栏明细、但所属栏组有在栏明细时,栏位并入栏组
// - 其余栏位各自为统计范围
// 红线: 防止栏组与成员栏位重复计算
// ==========================================

use crate::domain::cycle::OccupancyDetail;
use crate::domain::farm::FarmDirectory;
use crate::domain::feed::ConsumptionItem;
use crate::domain::types::ScopeKey;
use std::collections::{HashMap, HashSet};

/// 饲喂记录归属结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemScope {
    Scoped(ScopeKey),
    Duplicate,  // 成员栏位记录,栏组已整体计量
    Unassigned, // 未指定栏位/栏组
}

// ==========================================
// ScopeResolver - 统计范围解析器
// ==========================================
#[derive(Debug, Clone)]
pub struct ScopeResolver<'a> {
    directory: &'a FarmDirectory,
    detail_groups: HashMap<String, String>,
    tracked_groups: HashSet<String>,
    areas_with_presence: HashSet<String>,
    groups_with_presence: HashSet<String>,
}

impl<'a> ScopeResolver<'a> {
    /// 构建解析器
    ///
    /// # 参数
    /// - `details`: 周期占栏明细
    /// - `items`: 周期饲喂记录 (用于识别栏组级计量)
    /// - `directory`: 主数据目录
    pub fn new(
        details: &[OccupancyDetail],
        items: &[ConsumptionItem],
        directory: &'a FarmDirectory,
    ) -> Self {
        let mut detail_groups = HashMap::new();
        let mut areas_with_presence = HashSet::new();
        let mut groups_with_presence = HashSet::new();

        for detail in details {
            if let (Some(area), Some(group)) = (&detail.area_id, &detail.area_group_id) {
                detail_groups.insert(area.clone(), group.clone());
            }
            if !detail.is_active_presence() {
                continue;
            }
            match (&detail.area_id, &detail.area_group_id) {
                (Some(area), _) => {
                    areas_with_presence.insert(area.clone());
                }
                (None, Some(group)) => {
                    groups_with_presence.insert(group.clone());
                }
                (None, None) => {}
            }
        }

        let tracked_groups = items
            .iter()
            .filter(|i| i.is_group_level())
            .filter_map(|i| i.area_group_id.clone())
            .collect();

        Self {
            directory,
            detail_groups,
            tracked_groups,
            areas_with_presence,
            groups_with_presence,
        }
    }

    /// 栏位所属栏组
    pub fn group_of(&self, area_id: &str) -> Option<&str> {
        self.detail_groups
            .get(area_id)
            .map(String::as_str)
            .or_else(|| self.directory.group_of(area_id))
    }

    /// 栏组是否为栏组级计量
    pub fn is_tracked_group(&self, group_id: &str) -> bool {
        self.tracked_groups.contains(group_id)
    }

    /// 栏位的统计范围
    pub fn area_scope(&self, area_id: &str) -> ScopeKey {
        if let Some(group) = self.group_of(area_id) {
            let folded = self.tracked_groups.contains(group)
                || (!self.areas_with_presence.contains(area_id)
                    && self.groups_with_presence.contains(group));
            if folded {
                return ScopeKey::Group(group.to_string());
            }
        }
        ScopeKey::Area(area_id.to_string())
    }

    /// 占栏明细的统计范围
    pub fn detail_scope(&self, detail: &OccupancyDetail) -> Option<ScopeKey> {
        match (&detail.area_id, &detail.area_group_id) {
            (Some(area), _) => Some(self.area_scope(area)),
            (None, Some(group)) => Some(ScopeKey::Group(group.clone())),
            (None, None) => None,
        }
    }

    /// 饲喂记录的统计范围
    pub fn item_scope(&self, item: &ConsumptionItem) -> ItemScope {
        if let Some(area) = item.area_id.as_deref() {
            let group = item.area_group_id.as_deref().or_else(|| self.group_of(area));
            if group.map_or(false, |g| self.tracked_groups.contains(g)) {
                return ItemScope::Duplicate;
            }
            return ItemScope::Scoped(self.area_scope(area));
        }

        match item.area_group_id.as_deref() {
            Some(group) => ItemScope::Scoped(ScopeKey::Group(group.to_string())),
            None => ItemScope::Unassigned,
        }
    }

    /// 剔除重复计量的成员栏位记录 (幂等)
    pub fn canonicalize(&self, items: &[ConsumptionItem]) -> Vec<ConsumptionItem> {
        items
            .iter()
            .filter(|i| self.item_scope(i) != ItemScope::Duplicate)
            .cloned()
            .collect()
    }
}
