// ==========================================
// 预测对账系统 - 平滑引擎
// ==========================================
// 职责: 将调整系数回写到每一条原始预测行
// 规则: 左连接系数表；未命中 → 系数 1.0（原样透传）
//       smoothed = round(quantity × factor)，半数取偶
// 红线: 输出行数 == 输入行数,顺序不变
// ==========================================

use crate::domain::forecast::{ForecastLine, ReconciliationFactor, SmoothedForecastLine};
use crate::domain::types::ForecastKey;
use std::collections::HashMap;

/// 无目标计划时的透传系数
pub const PASS_THROUGH_FACTOR: f64 = 1.0;

#[derive(Debug, Clone, Default)]
pub struct SmoothResult {
    pub lines: Vec<SmoothedForecastLine>,
    pub unmatched: usize, // 按透传系数处理的行数
}

// ==========================================
// Smoother - 平滑引擎
// ==========================================
pub struct Smoother;

impl Smoother {
    pub fn smooth(&self, lines: &[ForecastLine], factors: &[ReconciliationFactor]) -> SmoothResult {
        let factor_by_key: HashMap<ForecastKey, f64> =
            factors.iter().map(|f| (f.key(), f.factor)).collect();

        let mut unmatched = 0;
        let smoothed = lines
            .iter()
            .map(|line| {
                let factor = match factor_by_key.get(&line.key()) {
                    Some(factor) => *factor,
                    None => {
                        unmatched += 1;
                        PASS_THROUGH_FACTOR
                    }
                };

                SmoothedForecastLine {
                    article_id: line.article_id.clone(),
                    customer_id: line.customer_id.clone(),
                    month: line.month,
                    quantity: line.quantity,
                    factor,
                    smoothed_quantity: smooth_quantity(line.quantity, factor),
                }
            })
            .collect();

        SmoothResult {
            lines: smoothed,
            unmatched,
        }
    }
}

/// round(quantity × factor),半数取偶
pub fn smooth_quantity(quantity: f64, factor: f64) -> i64 {
    (quantity * factor).round_ties_even() as i64
}
