// ==========================================
// 畜牧饲料成本核算引擎 - 比值与分摊工具
// ==========================================
// 红线: 零分母一律返回 0,不向外暴露 NaN/Infinity
// ==========================================

/// 安全除法 (分母为 0 或结果非有限数时返回 0)
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// 百分比 (0 ~ 100)
pub fn percentage(part: f64, total: f64) -> f64 {
    safe_div(part, total) * 100.0
}

/// 按权重比例分摊总额
///
/// # 规则
/// - 权重合计 > 0: 按比例分摊,最后一项承担舍入差,保证合计严格等于 total
/// - 权重合计 = 0: 平均分摊
/// - 无参与方: 返回空
pub fn allocate_proportional(total: f64, weights: &[f64]) -> Vec<f64> {
    if weights.is_empty() {
        return Vec::new();
    }

    let weight_sum: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    let n = weights.len();
    let mut shares = Vec::with_capacity(n);
    let mut assigned = 0.0;

    for (i, weight) in weights.iter().enumerate() {
        let share = if i == n - 1 {
            total - assigned
        } else if weight_sum > 0.0 {
            total * weight.max(0.0) / weight_sum
        } else {
            total / n as f64
        };
        assigned += share;
        shares.push(share);
    }

    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_div_zero_denominator() {
        assert_eq!(safe_div(10.0, 0.0), 0.0);
        assert_eq!(safe_div(0.0, 0.0), 0.0);
        assert_eq!(safe_div(10.0, 4.0), 2.5);
    }

    #[test]
    fn test_allocate_proportional_by_animal_days() {
        let shares = allocate_proportional(40.0, &[100.0, 300.0]);
        assert!((shares[0] - 10.0).abs() < 1e-9);
        assert!((shares[1] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_allocate_proportional_sum_is_exact() {
        let shares = allocate_proportional(100.0, &[1.0, 1.0, 1.0]);
        let total: f64 = shares.iter().sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn test_allocate_proportional_zero_weights_split_equally() {
        let shares = allocate_proportional(9.0, &[0.0, 0.0, 0.0]);
        assert_eq!(shares.len(), 3);
        assert!(shares.iter().all(|s| (s - 3.0).abs() < 1e-9));
        assert!(allocate_proportional(9.0, &[]).is_empty());
    }

    #[test]
    fn test_allocate_proportional_last_zero_weight_gets_nothing() {
        let shares = allocate_proportional(50.0, &[10.0, 0.0]);
        assert!((shares[0] - 50.0).abs() < 1e-9);
        assert!(shares[1].abs() < 1e-9);
    }
}
