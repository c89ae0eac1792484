// ==========================================
// 预测对账系统 - 调整系数计算
// ==========================================
// 职责: 汇总预测与目标计划内连接,逐 (客户, 月份) 计算系数
// 规则（顺序不可调换）:
//   1. actual == 0 → 0.0
//   2. target == 0 → 1.0
//   3. 其他 → target / actual
// ==========================================

use crate::domain::forecast::{AggregatedActual, ReconciliationFactor, TargetEntry};
use crate::domain::types::ForecastKey;
use std::collections::HashMap;

/// 单个 (客户, 月份) 的调整系数
pub fn compute_factor(summed_quantity: f64, target_quantity: f64) -> f64 {
    if summed_quantity == 0.0 {
        return 0.0;
    }
    if target_quantity == 0.0 {
        return 1.0;
    }
    target_quantity / summed_quantity
}

// ==========================================
// FactorCalculator - 系数计算引擎
// ==========================================
pub struct FactorCalculator;

impl FactorCalculator {
    /// 内连接汇总预测与目标计划
    ///
    /// 只存在于一侧的主键不进入系数表；同一主键的多条目标量先求和
    pub fn calculate(
        &self,
        actuals: &[AggregatedActual],
        targets: &[TargetEntry],
    ) -> Vec<ReconciliationFactor> {
        let mut target_by_key: HashMap<ForecastKey, f64> = HashMap::new();
        for target in targets {
            *target_by_key.entry(target.key()).or_insert(0.0) += target.target_quantity;
        }

        actuals
            .iter()
            .filter_map(|actual| {
                let target = target_by_key.get(&actual.key())?;
                Some(ReconciliationFactor {
                    customer_id: actual.customer_id.clone(),
                    month: actual.month,
                    factor: compute_factor(actual.summed_quantity, *target),
                })
            })
            .collect()
    }

    /// 系数表平均值（空表返回 None）
    pub fn average_factor(&self, factors: &[ReconciliationFactor]) -> Option<f64> {
        if factors.is_empty() {
            return None;
        }
        let total: f64 = factors.iter().map(|f| f.factor).sum();
        Some(total / factors.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actual(customer: &str, month: i32, summed_quantity: f64) -> AggregatedActual {
        AggregatedActual {
            customer_id: customer.to_string(),
            month,
            summed_quantity,
        }
    }

    fn target(customer: &str, month: i32, target_quantity: f64) -> TargetEntry {
        TargetEntry {
            customer_id: customer.to_string(),
            month,
            target_quantity,
        }
    }

    #[test]
    fn test_zero_actual_always_zero() {
        assert_eq!(compute_factor(0.0, 0.0), 0.0);
        assert_eq!(compute_factor(0.0, 50.0), 0.0);
    }

    #[test]
    fn test_zero_target_passes_through() {
        assert_eq!(compute_factor(5.0, 0.0), 1.0);
    }

    #[test]
    fn test_ratio() {
        assert_eq!(compute_factor(5.0, 10.0), 2.0);
        assert!((compute_factor(150.0, 180.0) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_inner_join_drops_one_sided_keys() {
        let actuals = vec![actual("C1", 1, 100.0), actual("C2", 1, 50.0)];
        let targets = vec![target("C1", 1, 120.0), target("C3", 1, 10.0)];

        let factors = FactorCalculator.calculate(&actuals, &targets);

        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].customer_id, "C1");
        assert!((factors[0].factor - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_targets_are_summed() {
        let actuals = vec![actual("C1", 1, 100.0)];
        let targets = vec![target("C1", 1, 60.0), target("C1", 1, 90.0)];

        let factors = FactorCalculator.calculate(&actuals, &targets);

        assert_eq!(factors[0].factor, 1.5);
    }

    #[test]
    fn test_average_factor() {
        let factors = vec![
            ReconciliationFactor {
                customer_id: "C1".to_string(),
                month: 1,
                factor: 1.0,
            },
            ReconciliationFactor {
                customer_id: "C1".to_string(),
                month: 2,
                factor: 2.0,
            },
        ];
        assert_eq!(FactorCalculator.average_factor(&factors), Some(1.5));
        assert_eq!(FactorCalculator.average_factor(&[]), None);
    }
}
