// ==========================================
// 畜牧饲料成本核算引擎 - 命令行入口
// ==========================================
// 用法:
//   feed-cost-report <batch.json> [pivot]
//                    [--consumption <consumption.csv>] [--prices <price_tiers.csv>]
//
// pivot: 透视配置 JSON 文件,或简写 "rows=feed_type;values=quantity:sum"
// 输出: stdout 打印 JSON (批量报告,可选透视表); 日志写 stderr
// ==========================================

use anyhow::{bail, Context};
use chrono::Local;
use livestock_feed_cost::config::ConfigManager;
use livestock_feed_cost::importer;
use livestock_feed_cost::{logging, CycleReportOrchestrator, PivotConfig, PivotEngine};
use serde_json::json;
use std::path::Path;
use tracing::info;

#[derive(Debug, Default)]
struct CliArgs {
    batch_path: String,
    pivot: Option<String>,
    consumption_csv: Option<String>,
    prices_csv: Option<String>,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut positional = Vec::new();
    let mut cli = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--consumption" => {
                cli.consumption_csv = Some(args.next().context("--consumption 需要文件路径")?)
            }
            "--prices" => cli.prices_csv = Some(args.next().context("--prices 需要文件路径")?),
            "-h" | "--help" => {
                bail!("用法: feed-cost-report <batch.json> [pivot] [--consumption <csv>] [--prices <csv>]")
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    cli.batch_path = positional
        .next()
        .context("缺少批量输入文件 (batch.json)")?;
    cli.pivot = positional.next();
    Ok(cli)
}

fn load_pivot(expr: &str) -> anyhow::Result<PivotConfig> {
    if Path::new(expr).extension().map_or(false, |e| e == "json") {
        importer::load_pivot_config(expr).with_context(|| format!("透视配置加载失败: {}", expr))
    } else {
        PivotConfig::from_inline(expr).with_context(|| format!("透视配置无效: {}", expr))
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();

    info!("==================================================");
    info!("{} v{}", livestock_feed_cost::APP_NAME, livestock_feed_cost::VERSION);
    info!("==================================================");

    let cli = parse_args()?;

    let manager = ConfigManager::load().context("引擎配置加载失败")?;
    info!(source = ?manager.source(), "引擎配置已加载");
    let config = manager.into_config();

    let mut batch = importer::load_batch_json(&cli.batch_path)
        .with_context(|| format!("批量输入加载失败: {}", cli.batch_path))?;
    if let Some(path) = &cli.consumption_csv {
        batch.consumption = importer::read_consumption_csv(path)
            .with_context(|| format!("饲喂记录读取失败: {}", path))?;
    }
    if let Some(path) = &cli.prices_csv {
        batch.price_tiers = importer::read_price_tiers_csv(path)
            .with_context(|| format!("价格档读取失败: {}", path))?;
    }

    let today = config.reference_date_or(Local::now().date_naive());
    let orchestrator = CycleReportOrchestrator::new(&config);
    let report = orchestrator.run_batch(&batch, today);

    let output = match cli.pivot.as_deref() {
        Some(expr) => {
            let pivot_config = load_pivot(expr)?;
            let table = PivotEngine::new().generate(&orchestrator.pivot_rows(&batch), &pivot_config)?;
            json!({ "report": report, "pivot": table })
        }
        None => serde_json::to_value(&report)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
