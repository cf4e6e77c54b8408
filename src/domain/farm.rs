// ==========================================
// 畜牧饲料成本核算引擎 - 养殖场目录
// ==========================================
// 职责: 栏位 / 栏组 / 饲料种类的主数据与一次性索引
// 用途: 名称展示、栏位所属栏组查询
// ==========================================

use crate::domain::feed::FeedType;
use crate::domain::types::ScopeKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Area - 栏位
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub group_id: Option<String>, // 所属栏组
}

// ==========================================
// AreaGroup - 栏组
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaGroup {
    pub id: String,
    pub name: String,
}

// ==========================================
// FarmDirectory - 主数据索引
// ==========================================
// 每次调用构建一次,之后所有查询均为 O(1)
#[derive(Debug, Clone, Default)]
pub struct FarmDirectory {
    feed_types: HashMap<String, FeedType>,
    areas: HashMap<String, Area>,
    groups: HashMap<String, AreaGroup>,
}

impl FarmDirectory {
    pub fn new(feed_types: &[FeedType], areas: &[Area], groups: &[AreaGroup]) -> Self {
        Self {
            feed_types: feed_types
                .iter()
                .map(|f| (f.id.clone(), f.clone()))
                .collect(),
            areas: areas.iter().map(|a| (a.id.clone(), a.clone())).collect(),
            groups: groups.iter().map(|g| (g.id.clone(), g.clone())).collect(),
        }
    }

    pub fn feed_type(&self, id: &str) -> Option<&FeedType> {
        self.feed_types.get(id)
    }

    pub fn area(&self, id: &str) -> Option<&Area> {
        self.areas.get(id)
    }

    pub fn group(&self, id: &str) -> Option<&AreaGroup> {
        self.groups.get(id)
    }

    /// 栏位所属栏组 (目录中未登记则返回 None)
    pub fn group_of(&self, area_id: &str) -> Option<&str> {
        self.areas
            .get(area_id)
            .and_then(|a| a.group_id.as_deref())
    }

    /// 饲料名称 (未登记时回退为 id)
    pub fn feed_type_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.feed_types.get(id).map_or(id, |f| f.name.as_str())
    }

    pub fn area_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.areas.get(id).map_or(id, |a| a.name.as_str())
    }

    pub fn group_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.groups.get(id).map_or(id, |g| g.name.as_str())
    }

    /// 统计范围展示名称
    pub fn scope_name(&self, scope: &ScopeKey) -> String {
        match scope {
            ScopeKey::Area(id) => self.area_name(id).to_string(),
            ScopeKey::Group(id) => self.group_name(id).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_lookup_falls_back_to_id() {
        let dir = FarmDirectory::new(
            &[],
            &[Area {
                id: "A1".to_string(),
                name: "Stall 1".to_string(),
                group_id: Some("G1".to_string()),
            }],
            &[],
        );

        assert_eq!(dir.area_name("A1"), "Stall 1");
        assert_eq!(dir.area_name("A9"), "A9");
        assert_eq!(dir.group_of("A1"), Some("G1"));
        assert_eq!(dir.group_name("G1"), "G1");
        assert_eq!(dir.feed_type_name("F1"), "F1");
    }
}
