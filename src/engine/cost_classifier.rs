// ==========================================
// 畜牧饲料成本核算引擎 - 成本流水分类
// ==========================================
// 规则: 类目与配置的饲料成本类目 (默认 "Futterkosten") 不区分大小写相等时
//       计入饲料成本,否则计入其他成本
// ==========================================

use crate::config::EngineConfig;
use crate::domain::transaction::CostTransaction;

#[derive(Debug, Clone)]
pub struct CostClassifier {
    feed_categories: Vec<String>, // 已小写化
}

impl CostClassifier {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_categories(&config.feed_cost_categories)
    }

    pub fn with_categories<S: AsRef<str>>(categories: &[S]) -> Self {
        Self {
            feed_categories: categories
                .iter()
                .map(|c| c.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn is_feed_cost(&self, transaction: &CostTransaction) -> bool {
        let category = transaction.category.trim().to_lowercase();
        self.feed_categories.iter().any(|c| *c == category)
    }

    /// 拆分成本流水合计
    ///
    /// # 返回
    /// (饲料类合计, 其他类合计)
    pub fn split_totals(&self, transactions: &[CostTransaction]) -> (f64, f64) {
        transactions.iter().fold((0.0, 0.0), |(feed, other), tx| {
            if self.is_feed_cost(tx) {
                (feed + tx.amount, other)
            } else {
                (feed, other + tx.amount)
            }
        })
    }
}

impl Default for CostClassifier {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(category: &str, amount: f64) -> CostTransaction {
        CostTransaction {
            cycle_id: None,
            amount,
            transaction_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category: category.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_feed_category_case_insensitive() {
        let classifier = CostClassifier::default();
        assert!(classifier.is_feed_cost(&tx("FUTTERKOSTEN", 1.0)));
        assert!(classifier.is_feed_cost(&tx(" futterkosten ", 1.0)));
        assert!(!classifier.is_feed_cost(&tx("Tierarzt", 1.0)));

        let (feed, other) =
            classifier.split_totals(&[tx("Futterkosten", 20.0), tx("Energie", 5.0), tx("Tierarzt", 7.5)]);
        assert_eq!(feed, 20.0);
        assert_eq!(other, 12.5);
    }
}
