// ==========================================
// 预测对账系统 - 演示目标计划模拟
// ==========================================
// 职责: 无外部目标计划时,在汇总预测上叠加均匀噪声生成演示计划
// 规则: target = trunc(summed × U[noise_min, noise_max))
// 红线: 固定种子 → 相同输入必得相同计划
// ==========================================

use crate::domain::forecast::{AggregatedActual, TargetEntry};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

pub struct TargetSimulator {
    seed: u64,
    noise_min: f64,
    noise_max: f64,
}

impl TargetSimulator {
    pub fn new(seed: u64, noise_min: f64, noise_max: f64) -> Self {
        Self {
            seed,
            noise_min,
            noise_max,
        }
    }

    /// 按输入顺序为每个 (客户, 月份) 抽取一次噪声
    pub fn simulate(&self, actuals: &[AggregatedActual]) -> Vec<TargetEntry> {
        let mut rng = StdRng::seed_from_u64(self.seed);

        let entries: Vec<TargetEntry> = actuals
            .iter()
            .map(|actual| {
                let noise: f64 = if self.noise_min < self.noise_max {
                    rng.gen_range(self.noise_min..self.noise_max)
                } else {
                    self.noise_min
                };
                TargetEntry {
                    customer_id: actual.customer_id.clone(),
                    month: actual.month,
                    target_quantity: (actual.summed_quantity * noise).trunc(),
                }
            })
            .collect();

        info!(
            entries = entries.len(),
            seed = self.seed,
            "演示目标计划已模拟"
        );
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actuals() -> Vec<AggregatedActual> {
        (1..=12)
            .map(|month| AggregatedActual {
                customer_id: "C1".to_string(),
                month,
                summed_quantity: 1000.0 + month as f64,
            })
            .collect()
    }

    #[test]
    fn test_same_seed_same_plan() {
        let first = TargetSimulator::new(42, 0.9, 1.25).simulate(&actuals());
        let second = TargetSimulator::new(42, 0.9, 1.25).simulate(&actuals());
        assert_eq!(first, second);
    }

    #[test]
    fn test_targets_within_noise_band() {
        let input = actuals();
        let plan = TargetSimulator::new(7, 0.9, 1.25).simulate(&input);

        for (actual, target) in input.iter().zip(&plan) {
            assert_eq!(actual.key(), target.key());
            assert!(target.target_quantity >= (actual.summed_quantity * 0.9).trunc());
            assert!(target.target_quantity <= (actual.summed_quantity * 1.25).trunc());
            assert_eq!(target.target_quantity, target.target_quantity.trunc());
        }
    }

    #[test]
    fn test_degenerate_band_uses_lower_bound() {
        let plan = TargetSimulator::new(1, 1.0, 1.0).simulate(&actuals());
        assert_eq!(plan[0].target_quantity, 1001.0);
    }
}
