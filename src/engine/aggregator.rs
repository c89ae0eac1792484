// ==========================================
// 预测对账系统 - 汇总引擎
// ==========================================
// 职责: 按 (客户, 月份) 汇总预测数量
// 输入: 已规范化的 ForecastLine
// 输出: AggregatedActual（按主键排序,调用方不应依赖顺序）
// ==========================================

use crate::domain::forecast::{AggregatedActual, ForecastLine};
use crate::domain::types::ForecastKey;
use std::collections::BTreeMap;

// ==========================================
// Aggregator - 汇总引擎
// ==========================================
// 红线: 无状态引擎,所有方法都是纯函数
pub struct Aggregator;

impl Aggregator {
    /// 汇总预测行
    ///
    /// 数量非正或非有限的行在汇总前排除
    pub fn aggregate(&self, lines: &[ForecastLine]) -> Vec<AggregatedActual> {
        let mut sums: BTreeMap<ForecastKey, f64> = BTreeMap::new();
        for line in lines {
            if !(line.quantity.is_finite() && line.quantity > 0.0) {
                continue;
            }
            *sums.entry(line.key()).or_insert(0.0) += line.quantity;
        }

        sums.into_iter()
            .map(|(key, summed_quantity)| AggregatedActual {
                customer_id: key.customer_id,
                month: key.month,
                summed_quantity,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(article: &str, customer: &str, month: i32, quantity: f64) -> ForecastLine {
        ForecastLine {
            article_id: article.to_string(),
            customer_id: customer.to_string(),
            month,
            quantity,
        }
    }

    #[test]
    fn test_split_rows_equal_combined_row() {
        let split = vec![
            line("A1", "C1", 1, 30.0),
            line("A2", "C1", 1, 45.0),
            line("A3", "C1", 1, 25.0),
        ];
        let combined = vec![line("A1", "C1", 1, 100.0)];

        assert_eq!(Aggregator.aggregate(&split), Aggregator.aggregate(&combined));
    }

    #[test]
    fn test_aggregation_is_order_independent() {
        let lines = vec![
            line("A1", "C2", 2, 5.0),
            line("A2", "C1", 1, 10.0),
            line("A3", "C2", 2, 7.0),
        ];
        let mut reversed = lines.clone();
        reversed.reverse();

        assert_eq!(Aggregator.aggregate(&lines), Aggregator.aggregate(&reversed));
    }

    #[test]
    fn test_groups_by_customer_and_month() {
        let lines = vec![
            line("A1", "C1", 1, 100.0),
            line("A2", "C1", 1, 50.0),
            line("A3", "C1", 2, 10.0),
            line("A4", "C2", 1, 1.0),
        ];

        let result = Aggregator.aggregate(&lines);

        assert_eq!(result.len(), 3);
        let c1_jan = result
            .iter()
            .find(|a| a.customer_id == "C1" && a.month == 1)
            .unwrap();
        assert_eq!(c1_jan.summed_quantity, 150.0);
    }

    #[test]
    fn test_non_positive_quantities_excluded() {
        let lines = vec![
            line("A1", "C1", 1, 0.0),
            line("A2", "C1", 1, -5.0),
            line("A3", "C1", 1, f64::NAN),
            line("A4", "C1", 1, 8.0),
        ];

        let result = Aggregator.aggregate(&lines);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].summed_quantity, 8.0);
    }
}
