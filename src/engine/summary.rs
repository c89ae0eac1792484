// ==========================================
// 预测对账系统 - 月度汇总
// ==========================================
// 职责: 平滑前后按月合计,供输出工作簿的对比图使用
// ==========================================

use crate::domain::forecast::{MonthlyComparison, SmoothedForecastLine};
use std::collections::BTreeMap;

pub struct MonthlySummary;

impl MonthlySummary {
    /// 按月份升序返回平滑前后合计
    pub fn compare(&self, lines: &[SmoothedForecastLine]) -> Vec<MonthlyComparison> {
        let mut totals: BTreeMap<i32, (f64, i64)> = BTreeMap::new();
        for line in lines {
            let entry = totals.entry(line.month).or_insert((0.0, 0));
            entry.0 += line.quantity;
            entry.1 += line.smoothed_quantity;
        }

        totals
            .into_iter()
            .map(|(month, (original_total, smoothed_total))| MonthlyComparison {
                month,
                original_total,
                smoothed_total,
            })
            .collect()
    }
}
