// ==========================================
// 导入层集成测试
// ==========================================
// 测试目标: CSV 饲喂记录/价格档、JSON 批量输入与透视配置
// ==========================================

mod helpers;

use helpers::test_data_builder::date;
use livestock_feed_cost::domain::types::PivotDimension;
use livestock_feed_cost::engine::{CycleReportOrchestrator, PivotError};
use livestock_feed_cost::importer::{self, ImportError};
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_read_consumption_and_price_csv() {
    let dir = TempDir::new().unwrap();
    let consumption = write(
        &dir,
        "consumption.csv",
        "date;feed_type_id;quantity;area_id;supplier_id\n\
         2024-01-01;GER;12,5;A1;\n\
         2024-01-02;GER;10;A1;S1\n",
    );
    let prices = write(
        &dir,
        "prices.csv",
        "feed_type_id,supplier_id,price_per_unit,valid_from,valid_to\n\
         GER,,0.30,2024-01-01,2024-01-31\n\
         GER,S1,0.28,2024-01-01,\n",
    );

    let records = importer::read_consumption_csv(&consumption).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].quantity, 12.5);
    assert_eq!(records[0].supplier_id, None);
    assert_eq!(records[1].supplier_id.as_deref(), Some("S1"));

    let tiers = importer::read_price_tiers_csv(&prices).unwrap();
    assert_eq!(tiers.len(), 2);
    assert_eq!(tiers[0].valid_to, Some(date(2024, 1, 31)));
    assert_eq!(tiers[1].supplier_id.as_deref(), Some("S1"));
    assert_eq!(tiers[1].valid_to, None);

    println!("✓ CSV 导入正确");
}

#[test]
fn test_csv_errors_carry_row_numbers() {
    let dir = TempDir::new().unwrap();
    let negative = write(
        &dir,
        "negative.csv",
        "date,feed_type_id,quantity\n2024-01-01,GER,1\n2024-01-02,GER,-3\n",
    );
    let bad_date = write(&dir, "bad_date.csv", "date,feed_type_id,quantity\n2024/01/01,GER,1\n");

    let err = importer::read_consumption_csv(&negative).unwrap_err();
    assert!(matches!(err, ImportError::ValueRangeError { row: 2, .. }));

    let err = importer::read_consumption_csv(&bad_date).unwrap_err();
    assert!(matches!(err, ImportError::DateFormatError { row: 1, .. }));

    let err = importer::read_consumption_csv(dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));
}

#[test]
fn test_load_batch_json_and_run() {
    let dir = TempDir::new().unwrap();
    let batch_path = write(
        &dir,
        "batch.json",
        r#"{
            "cycles": [{
                "id": "C1",
                "start_date": "2024-01-01",
                "end_date": "2024-01-10",
                "details": [
                    {"area_id": "A1", "count": 100, "start_date": "2024-01-01"}
                ]
            }],
            "consumption": [
                {"date": "2024-01-01", "feed_type_id": "F", "quantity": 25.0, "area_id": "A1"},
                {"date": "2024-01-11", "feed_type_id": "F", "quantity": 25.0, "area_id": "A1"}
            ],
            "price_tiers": [
                {"feed_type_id": "F", "price_per_unit": 2.0, "valid_from": "2024-01-01"}
            ]
        }"#,
    );

    let batch = importer::load_batch_json(&batch_path).unwrap();
    assert_eq!(batch.cycles.len(), 1);
    assert!(batch.cost_transactions.is_empty());

    let report = CycleReportOrchestrator::default().run_batch(&batch, date(2024, 2, 1));
    let metrics = &report.reports[0].metrics;
    assert_eq!(metrics.total_feed_cost, 50.0);
    assert_eq!(metrics.feed_cost_per_animal, 0.5);
}

#[test]
fn test_load_pivot_config() {
    let dir = TempDir::new().unwrap();
    let valid = write(
        &dir,
        "pivot.json",
        r#"{"rows":["area","month"],"values":[{"field":"total_cost","aggregation":"sum","label":"Kosten"}],"show_subtotals":true}"#,
    );
    let duplicate = write(
        &dir,
        "duplicate.json",
        r#"{"rows":["area"],"columns":["area"],"values":[{"field":"quantity","aggregation":"sum"}]}"#,
    );
    let malformed = write(&dir, "malformed.json", r#"{"rows":["area"],"values":"#);

    let config = importer::load_pivot_config(&valid).unwrap();
    assert_eq!(config.rows, vec![PivotDimension::Area, PivotDimension::Month]);
    assert_eq!(config.values[0].display_label(), "Kosten");
    assert!(config.show_subtotals);

    let err = importer::load_pivot_config(&duplicate).unwrap_err();
    assert!(matches!(
        err,
        ImportError::PivotConfig(PivotError::DuplicateDimension(ref d)) if d == "area"
    ));

    let err = importer::load_pivot_config(&malformed).unwrap_err();
    assert!(matches!(err, ImportError::JsonParseError(_)));
}

#[test]
fn test_batch_json_rejects_negative_values() {
    let dir = TempDir::new().unwrap();
    let negative_quantity = write(
        &dir,
        "negative_quantity.json",
        r#"{
            "cycles": [],
            "consumption": [
                {"date": "2024-01-01", "feed_type_id": "F", "quantity": 5.0},
                {"date": "2024-01-02", "feed_type_id": "F", "quantity": -2.5}
            ]
        }"#,
    );
    let negative_price = write(
        &dir,
        "negative_price.json",
        r#"{
            "cycles": [],
            "price_tiers": [
                {"feed_type_id": "F", "price_per_unit": -0.1, "valid_from": "2024-01-01"}
            ]
        }"#,
    );

    let err = importer::load_batch_json(&negative_quantity).unwrap_err();
    assert!(matches!(
        err,
        ImportError::ValueRangeError { row: 2, ref field, value } if field == "quantity" && value == -2.5
    ));

    let err = importer::load_batch_json(&negative_price).unwrap_err();
    assert!(matches!(
        err,
        ImportError::ValueRangeError { row: 1, ref field, .. } if field == "price_per_unit"
    ));

    println!("✓ JSON 批量输入与 CSV 一样拒绝负数");
}
