// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use livestock_feed_cost::domain::cycle::{LivestockCycle, OccupancyDetail};
use livestock_feed_cost::domain::farm::{Area, AreaGroup};
use livestock_feed_cost::domain::feed::{ConsumptionItem, ConsumptionRecord, FeedType, PriceTier};
use livestock_feed_cost::domain::pivot::PivotRow;
use livestock_feed_cost::domain::transaction::{CostTransaction, IncomeTransaction};
use livestock_feed_cost::domain::types::OccupancyKind;

/// 日期简写
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// LivestockCycle 构建器
// ==========================================

pub struct CycleBuilder {
    cycle: LivestockCycle,
}

impl CycleBuilder {
    pub fn new(id: &str, start: NaiveDate) -> Self {
        Self {
            cycle: LivestockCycle {
                id: id.to_string(),
                name: None,
                start_date: start,
                end_date: None,
                details: Vec::new(),
            },
        }
    }

    pub fn end(mut self, end: NaiveDate) -> Self {
        self.cycle.end_date = Some(end);
        self
    }

    /// 栏位入栏明细
    pub fn area_presence(
        mut self,
        area: &str,
        count: u32,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> Self {
        self.cycle
            .details
            .push(presence(Some(area), None, count, from, to));
        self
    }

    /// 栏组入栏明细
    pub fn group_presence(
        mut self,
        group: &str,
        count: u32,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> Self {
        self.cycle
            .details
            .push(presence(None, Some(group), count, from, to));
        self
    }

    /// 设置最近一条明细的入栏体重与单价
    pub fn bought(mut self, avg_weight_kg: f64, price_per_animal: f64) -> Self {
        if let Some(detail) = self.cycle.details.last_mut() {
            detail.avg_weight_kg = Some(avg_weight_kg);
            detail.buy_price_per_animal = Some(price_per_animal);
        }
        self
    }

    /// 出栏明细
    pub fn sold(
        mut self,
        area: &str,
        count: u32,
        on: NaiveDate,
        avg_weight_kg: f64,
        price_per_animal: f64,
    ) -> Self {
        self.cycle.details.push(OccupancyDetail {
            kind: OccupancyKind::End,
            area_id: Some(area.to_string()),
            area_group_id: None,
            count,
            start_date: on,
            end_date: Some(on),
            avg_weight_kg: Some(avg_weight_kg),
            buy_price_per_animal: None,
            sell_price_per_animal: Some(price_per_animal),
        });
        self
    }

    pub fn build(self) -> LivestockCycle {
        self.cycle
    }
}

fn presence(
    area: Option<&str>,
    group: Option<&str>,
    count: u32,
    from: NaiveDate,
    to: Option<NaiveDate>,
) -> OccupancyDetail {
    OccupancyDetail {
        kind: OccupancyKind::Start,
        area_id: area.map(str::to_string),
        area_group_id: group.map(str::to_string),
        count,
        start_date: from,
        end_date: to,
        avg_weight_kg: None,
        buy_price_per_animal: None,
        sell_price_per_animal: None,
    }
}

// ==========================================
// 饲喂记录 / 价格档
// ==========================================

pub fn record(on: NaiveDate, feed: &str, quantity: f64, area: Option<&str>) -> ConsumptionRecord {
    ConsumptionRecord {
        date: on,
        feed_type_id: feed.to_string(),
        quantity,
        area_id: area.map(str::to_string),
        area_group_id: None,
        supplier_id: None,
    }
}

pub fn group_record(on: NaiveDate, feed: &str, quantity: f64, group: &str) -> ConsumptionRecord {
    ConsumptionRecord {
        area_group_id: Some(group.to_string()),
        ..record(on, feed, quantity, None)
    }
}

/// 每日饲喂记录 (from..=to)
pub fn daily_records(
    feed: &str,
    area: Option<&str>,
    from: NaiveDate,
    to: NaiveDate,
    quantity_per_day: f64,
) -> Vec<ConsumptionRecord> {
    from.iter_days()
        .take_while(|d| *d <= to)
        .map(|d| record(d, feed, quantity_per_day, area))
        .collect()
}

pub fn tier(feed: &str, price: f64, from: NaiveDate, to: Option<NaiveDate>) -> PriceTier {
    PriceTier {
        feed_type_id: feed.to_string(),
        supplier_id: None,
        supplier_name: None,
        price_per_unit: price,
        valid_from: from,
        valid_to: to,
    }
}

pub fn supplier_tier(
    feed: &str,
    supplier: &str,
    price: f64,
    from: NaiveDate,
    to: Option<NaiveDate>,
) -> PriceTier {
    PriceTier {
        supplier_id: Some(supplier.to_string()),
        supplier_name: Some(format!("Lieferant {}", supplier)),
        ..tier(feed, price, from, to)
    }
}

/// 已计价记录
pub fn priced_item(on: NaiveDate, feed: &str, quantity: f64, price: f64, area: Option<&str>) -> ConsumptionItem {
    ConsumptionItem {
        date: on,
        feed_type_id: feed.to_string(),
        quantity,
        area_id: area.map(str::to_string),
        area_group_id: None,
        price_per_unit: Some(price),
        total_cost: quantity * price,
        supplier_id: None,
        supplier_name: None,
    }
}

// ==========================================
// 流水
// ==========================================

pub fn cost(cycle: &str, category: &str, amount: f64, on: NaiveDate) -> CostTransaction {
    CostTransaction {
        cycle_id: Some(cycle.to_string()),
        amount,
        transaction_date: on,
        category: category.to_string(),
        description: None,
    }
}

pub fn income(cycle: &str, amount: f64, on: NaiveDate) -> IncomeTransaction {
    IncomeTransaction {
        cycle_id: Some(cycle.to_string()),
        amount,
        transaction_date: on,
        income_type: "Sonstiges".to_string(),
        description: None,
    }
}

// ==========================================
// 主数据
// ==========================================

pub fn feed_type(id: &str, name: &str) -> FeedType {
    FeedType {
        id: id.to_string(),
        name: name.to_string(),
        unit: "kg".to_string(),
    }
}

pub fn area(id: &str, name: &str, group: Option<&str>) -> Area {
    Area {
        id: id.to_string(),
        name: name.to_string(),
        group_id: group.map(str::to_string),
    }
}

pub fn area_group(id: &str, name: &str) -> AreaGroup {
    AreaGroup {
        id: id.to_string(),
        name: name.to_string(),
    }
}

// ==========================================
// 透视行
// ==========================================

pub fn pivot_row(on: NaiveDate, feed: &str, area: Option<&str>, quantity: f64, price: f64) -> PivotRow {
    PivotRow {
        date: on,
        feed_type_id: feed.to_string(),
        feed_type_name: feed.to_string(),
        area_id: area.map(str::to_string),
        area_name: area.map(str::to_string),
        area_group_id: None,
        area_group_name: None,
        supplier_id: None,
        supplier_name: None,
        quantity,
        total_cost: quantity * price,
        price_per_unit: price,
    }
}
