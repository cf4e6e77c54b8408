// ==========================================
// 畜牧饲料成本核算引擎 - 养殖周期领域模型
// ==========================================
// 职责: 养殖周期 / 占栏明细 / 日期区间
// 红线: 开放区间 (end_date 为空) 截止到周期结束日,进行中周期截止到 today
// ==========================================

use crate::domain::types::OccupancyKind;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

// ==========================================
// DateInterval - 闭区间 [start, end]
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    /// 构造区间,end < start 时返回 None
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        if end < start {
            None
        } else {
            Some(Self { start, end })
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// 区间天数 (含两端)
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// 逐日迭代
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.days()).map(move |offset| start + Duration::days(offset))
    }
}

/// 合并重叠/相邻区间 (输出按开始日期排序)
pub fn merge_intervals(mut intervals: Vec<DateInterval>) -> Vec<DateInterval> {
    intervals.sort();
    let mut merged: Vec<DateInterval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end + Duration::days(1) => {
                if interval.end > last.end {
                    last.end = interval.end;
                }
            }
            _ => merged.push(interval),
        }
    }
    merged
}

// ==========================================
// OccupancyDetail - 占栏明细
// ==========================================
// 一行 = 一个栏位 (或栏组) 的一段在栏区间
// 同一周期同一栏位可有多行 (转群/出入栏)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyDetail {
    #[serde(default)]
    pub kind: OccupancyKind,
    #[serde(default)]
    pub area_id: Option<String>,
    #[serde(default)]
    pub area_group_id: Option<String>,
    pub count: u32, // 0 = 未启用
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    // ===== 体重与价格 (可选) =====
    #[serde(default)]
    pub avg_weight_kg: Option<f64>, // 平均体重 (kg/头)
    #[serde(default)]
    pub buy_price_per_animal: Option<f64>,
    #[serde(default)]
    pub sell_price_per_animal: Option<f64>,
}

impl OccupancyDetail {
    /// 是否为有效在栏明细 (入栏类型且头数 > 0)
    pub fn is_active_presence(&self) -> bool {
        self.kind == OccupancyKind::Start && self.count > 0
    }

    /// 解析实际在栏区间
    ///
    /// # 参数
    /// - `cycle_end`: 周期结束日 (进行中周期为 None)
    /// - `today`: 当前日期 (进行中周期的截止日)
    ///
    /// # 返回
    /// 区间为空 (结束早于开始) 时返回 None
    pub fn interval(&self, cycle_end: Option<NaiveDate>, today: NaiveDate) -> Option<DateInterval> {
        let end = self.end_date.or(cycle_end).unwrap_or(today);
        DateInterval::new(self.start_date, end)
    }

    /// 动物日 = 头数 × 在栏天数
    pub fn animal_days(&self, cycle_end: Option<NaiveDate>, today: NaiveDate) -> f64 {
        self.interval(cycle_end, today)
            .map_or(0.0, |i| self.count as f64 * i.days() as f64)
    }

    /// 总活重 (kg)
    pub fn total_weight_kg(&self) -> Option<f64> {
        self.avg_weight_kg.map(|w| w * self.count as f64)
    }
}

// ==========================================
// LivestockCycle - 养殖周期
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivestockCycle {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>, // None = 进行中
    #[serde(default)]
    pub details: Vec<OccupancyDetail>,
}

impl LivestockCycle {
    pub fn is_ongoing(&self) -> bool {
        self.end_date.is_none()
    }

    /// 有效结束日 (进行中周期取 today)
    pub fn effective_end(&self, today: NaiveDate) -> NaiveDate {
        self.end_date.unwrap_or(today)
    }

    /// 周期天数 (含两端,最少 1 天)
    pub fn duration_days(&self, today: NaiveDate) -> i64 {
        let days = (self.effective_end(today) - self.start_date).num_days() + 1;
        days.max(1)
    }

    pub fn start_details(&self) -> impl Iterator<Item = &OccupancyDetail> {
        self.details
            .iter()
            .filter(|d| d.kind == OccupancyKind::Start)
    }

    pub fn end_details(&self) -> impl Iterator<Item = &OccupancyDetail> {
        self.details.iter().filter(|d| d.kind == OccupancyKind::End)
    }
}
