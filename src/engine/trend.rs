// ==========================================
// 预测对账系统 - 趋势偏差分析引擎
// ==========================================
// 职责: 件数预测与销售计划（欧元）两条序列的趋势对比
// 流程: 汇总 → 内连接 → 按客户最小-最大归一化 → 偏差 → 排名
// 红线: 常数序列归一化为全 0
// ==========================================

use crate::domain::trend::{CustomerDeviation, PlanPoint, PrognosisPoint, TrendPoint};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

pub struct TrendAnalyzer;

impl TrendAnalyzer {
    /// 按 (客户, 期间) 汇总件数,只保留合计 > 0 的点
    pub fn aggregate_prognosis(&self, rows: &[PrognosisPoint]) -> Vec<PrognosisPoint> {
        let mut sums: BTreeMap<(String, NaiveDate), f64> = BTreeMap::new();
        for row in rows {
            *sums.entry((row.customer.clone(), row.period)).or_insert(0.0) += row.quantity;
        }

        sums.into_iter()
            .filter(|(_, quantity)| *quantity > 0.0)
            .map(|((customer, period), quantity)| PrognosisPoint {
                customer,
                period,
                quantity,
            })
            .collect()
    }

    /// 内连接两条序列并按客户归一化
    ///
    /// 输出按 (客户, 期间) 排序,同一客户的点连续
    pub fn compare(&self, prognosis: &[PrognosisPoint], plan: &[PlanPoint]) -> Vec<TrendPoint> {
        let mut plan_by_key: HashMap<(&str, NaiveDate), f64> = HashMap::new();
        for point in plan {
            *plan_by_key
                .entry((point.customer.as_str(), point.period))
                .or_insert(0.0) += point.revenue;
        }

        let mut by_customer: BTreeMap<&str, Vec<(NaiveDate, f64, f64)>> = BTreeMap::new();
        for point in prognosis {
            if let Some(revenue) = plan_by_key.get(&(point.customer.as_str(), point.period)) {
                by_customer
                    .entry(point.customer.as_str())
                    .or_default()
                    .push((point.period, point.quantity, *revenue));
            }
        }

        let mut result = Vec::new();
        for (customer, mut series) in by_customer {
            series.sort_by_key(|(period, _, _)| *period);

            let quantities: Vec<f64> = series.iter().map(|(_, q, _)| *q).collect();
            let revenues: Vec<f64> = series.iter().map(|(_, _, r)| *r).collect();
            let prognosis_trend = min_max_scale(&quantities);
            let plan_trend = min_max_scale(&revenues);

            for (idx, (period, quantity, revenue)) in series.into_iter().enumerate() {
                result.push(TrendPoint {
                    customer: customer.to_string(),
                    period,
                    quantity,
                    revenue,
                    prognosis_trend: prognosis_trend[idx],
                    plan_trend: plan_trend[idx],
                    deviation: prognosis_trend[idx] - plan_trend[idx],
                });
            }
        }
        result
    }

    /// 按平均绝对偏差降序排名（并列按客户名）
    pub fn rank(&self, points: &[TrendPoint]) -> Vec<CustomerDeviation> {
        let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for point in points {
            let entry = totals.entry(point.customer.as_str()).or_insert((0.0, 0));
            entry.0 += point.deviation.abs();
            entry.1 += 1;
        }

        let mut ranking: Vec<CustomerDeviation> = totals
            .into_iter()
            .map(|(customer, (sum, count))| CustomerDeviation {
                customer: customer.to_string(),
                mean_abs_deviation: sum / count as f64,
            })
            .collect();

        ranking.sort_by(|a, b| {
            b.mean_abs_deviation
                .total_cmp(&a.mean_abs_deviation)
                .then_with(|| a.customer.cmp(&b.customer))
        });
        ranking
    }
}

/// 最小-最大归一化到 [0, 1]；极差为 0 时全部为 0
pub fn min_max_scale(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|v| if range > 0.0 { (v - min) / range } else { 0.0 })
        .collect()
}
