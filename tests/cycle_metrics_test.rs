// ==========================================
// CycleMetricsCalculator 周期指标集成测试
// ==========================================
// 测试目标: 验证饲料成本、单头/日均成本、增重与料肉比、盈亏
// 覆盖范围: 计价 -> 在栏过滤 -> 周期指标 完整链路
// ==========================================

mod helpers;

use helpers::test_data_builder::{cost, daily_records, date, income, record, tier, CycleBuilder};
use livestock_feed_cost::domain::cycle::LivestockCycle;
use livestock_feed_cost::domain::farm::FarmDirectory;
use livestock_feed_cost::domain::feed::{ConsumptionRecord, PriceTier};
use livestock_feed_cost::domain::metrics::CycleMetrics;
use livestock_feed_cost::domain::transaction::{CostTransaction, IncomeTransaction};
use livestock_feed_cost::engine::{ConsumptionCostJoiner, CycleMetricsCalculator, TimeframeFilter};

const EPS: f64 = 1e-9;

// ==========================================
// 测试辅助函数
// ==========================================

fn run(
    cycle: &LivestockCycle,
    records: &[ConsumptionRecord],
    tiers: &[PriceTier],
    costs: &[CostTransaction],
    incomes: &[IncomeTransaction],
) -> CycleMetrics {
    let today = date(2024, 12, 31);
    let items = ConsumptionCostJoiner::new().join_with_tiers(records, tiers);
    let directory = FarmDirectory::default();
    let retained =
        TimeframeFilter::new().filter(&items, &cycle.details, &directory, cycle.end_date, today);
    CycleMetricsCalculator::default().calculate(cycle, &retained, costs, incomes, &directory, today)
}

fn ten_day_cycle() -> LivestockCycle {
    CycleBuilder::new("C1", date(2024, 1, 1))
        .end(date(2024, 1, 10))
        .area_presence("A1", 100, date(2024, 1, 1), Some(date(2024, 1, 10)))
        .build()
}

// ==========================================
// 测试用例
// ==========================================

#[test]
fn test_single_area_ten_days() {
    let cycle = ten_day_cycle();
    let records = daily_records("F", Some("A1"), date(2024, 1, 1), date(2024, 1, 10), 5.0);
    let tiers = vec![tier("F", 1.0, date(2024, 1, 1), None)];

    let m = run(&cycle, &records, &tiers, &[], &[]);

    assert_eq!(m.total_animals, 100);
    assert_eq!(m.cycle_duration_days, 10);
    assert!((m.total_feed_quantity - 50.0).abs() < EPS);
    assert!((m.total_feed_cost - 50.0).abs() < EPS);
    assert!((m.feed_cost_per_animal - 0.5).abs() < EPS);
    assert!((m.daily_feed_cost - 5.0).abs() < EPS);
    assert!((m.feed_efficiency - 1.0).abs() < EPS);
    assert_eq!(m.mortality_rate, 0.0);

    println!("✓ 单栏位 10 天: 50kg / €50 / €0.50 每头 / €5 每天");
}

#[test]
fn test_record_after_cycle_end_is_excluded() {
    let cycle = ten_day_cycle();
    let mut records = daily_records("F", Some("A1"), date(2024, 1, 1), date(2024, 1, 10), 5.0);
    records.push(record(date(2024, 1, 11), "F", 5.0, Some("A1")));
    let tiers = vec![tier("F", 1.0, date(2024, 1, 1), None)];

    let m = run(&cycle, &records, &tiers, &[], &[]);

    assert!((m.total_feed_quantity - 50.0).abs() < EPS);
    assert!((m.total_feed_cost - 50.0).abs() < EPS);

    println!("✓ 周期结束后的记录不计入");
}

#[test]
fn test_weight_gain_and_profit() {
    let cycle = CycleBuilder::new("C1", date(2024, 1, 1))
        .end(date(2024, 1, 10))
        .area_presence("A1", 10, date(2024, 1, 1), None)
        .bought(30.0, 60.0)
        .sold("A1", 10, date(2024, 1, 10), 40.0, 150.0)
        .build();
    let records = daily_records("F", Some("A1"), date(2024, 1, 1), date(2024, 1, 10), 20.0);
    let tiers = vec![tier("F", 0.5, date(2024, 1, 1), None)];
    let costs = vec![
        cost("C1", "Futterkosten", 25.0, date(2024, 1, 5)),
        cost("C1", "Tierarzt", 40.0, date(2024, 1, 6)),
    ];
    let incomes = vec![income("C1", 15.0, date(2024, 1, 10))];

    let m = run(&cycle, &records, &tiers, &costs, &incomes);

    // 饲料: 200kg × 0.5 = 100, 加饲料类流水 25
    assert!((m.consumption_feed_cost - 100.0).abs() < EPS);
    assert!((m.transaction_feed_cost - 25.0).abs() < EPS);
    assert!((m.total_feed_cost - 125.0).abs() < EPS);
    assert!((m.additional_costs - 40.0).abs() < EPS);

    // 增重: 400kg - 300kg = 100kg, 料肉比 200 / 100
    assert!((m.total_weight_gain_kg - 100.0).abs() < EPS);
    assert!((m.feed_conversion_ratio - 2.0).abs() < EPS);

    // 收入 1500 + 15, 成本 125 + 600 + 40
    assert!((m.total_revenue - 1515.0).abs() < EPS);
    assert!((m.animal_purchase_cost - 600.0).abs() < EPS);
    assert!((m.total_costs - 765.0).abs() < EPS);
    assert!((m.profit_loss - 750.0).abs() < EPS);
    assert!((m.profit_per_animal - 75.0).abs() < EPS);
    assert!((m.profit_margin - 750.0 / 1515.0 * 100.0).abs() < 1e-6);

    println!("✓ 增重、料肉比与盈亏计算正确");
}

#[test]
fn test_empty_cycle_is_zeroed_not_nan() {
    let cycle = CycleBuilder::new("C0", date(2024, 1, 1))
        .end(date(2024, 1, 1))
        .build();

    let m = run(&cycle, &[], &[], &[], &[]);

    assert_eq!(m.cycle_duration_days, 1);
    assert_eq!(m.total_feed_cost, 0.0);
    assert_eq!(m.feed_cost_per_animal, 0.0);
    assert_eq!(m.feed_conversion_ratio, 0.0);
    assert_eq!(m.profit_margin, 0.0);
    assert!(m.daily_feed_cost.is_finite());

    println!("✓ 空周期指标为 0");
}
