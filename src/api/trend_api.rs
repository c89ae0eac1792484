// ==========================================
// 预测对账系统 - 趋势偏差分析 API
// ==========================================
// 每个预测期独立分析并写出一个工作簿
// 单个预测期失败只记录错误,其余预测期照常执行
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{TrendConfig, TrendHorizon};
use crate::domain::trend::TrendReport;
use crate::engine::TrendAnalyzer;
use crate::exporter::TrendWorkbookWriter;
use crate::importer::{
    ParsedSheet, PlanCrosstabImporter, PlanImport, PrognosisImporter, UniversalFileParser,
};
use std::collections::HashSet;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// 输出文件名前缀
pub const TREND_FILE_PREFIX: &str = "Abweichungsanalyse_Trends";

#[derive(Default)]
pub struct TrendApi {
    plan_importer: PlanCrosstabImporter,
}

impl TrendApi {
    /// 对所有配置的预测期执行分析
    ///
    /// 全部预测期失败时返回第一个错误
    #[instrument(skip(self, config), fields(raw = %config.raw_data_path.display()))]
    pub fn run(&self, config: &TrendConfig) -> ApiResult<Vec<TrendReport>> {
        config.validate()?;

        let plan = self.plan_importer.import(&config.plan_path).map_err(|e| {
            error!(error = %e, "销售计划加载失败");
            ApiError::from(e)
        })?;
        info!(
            points = plan.points.len(),
            period_columns = plan.period_columns,
            skipped_columns = ?plan.skipped_columns,
            "销售计划加载完成"
        );
        let raw = UniversalFileParser.parse(&config.raw_data_path).map_err(|e| {
            error!(error = %e, "原始数据加载失败");
            ApiError::from(e)
        })?;

        let mut reports = Vec::new();
        let mut first_error = None;
        for horizon in &config.horizons {
            match self.run_horizon(config, &raw, &plan, horizon) {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!(suffix = %horizon.suffix, error = %e, "预测期分析失败");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) if reports.is_empty() => Err(e),
            _ => Ok(reports),
        }
    }

    fn run_horizon(
        &self,
        config: &TrendConfig,
        raw: &ParsedSheet,
        plan: &PlanImport,
        horizon: &TrendHorizon,
    ) -> ApiResult<TrendReport> {
        let extracted = PrognosisImporter.extract(raw, &config.customer_column, horizon)?;
        let prognosis = TrendAnalyzer.aggregate_prognosis(&extracted.rows);

        let points = TrendAnalyzer.compare(&prognosis, &plan.points);
        if points.is_empty() {
            let plan_keys: HashSet<_> = plan
                .points
                .iter()
                .map(|p| (&p.customer, p.period))
                .collect();
            return Err(ApiError::EmptyJoinResult {
                forecast_keys: prognosis.len(),
                target_keys: plan_keys.len(),
            });
        }

        let ranking = TrendAnalyzer.rank(&points);
        let output_path = config
            .output_dir
            .join(format!("{}{}.xlsx", TREND_FILE_PREFIX, horizon.suffix));
        let charts_written =
            TrendWorkbookWriter.write(&output_path, &points, &ranking, config.top_n)?;

        let flagged: Vec<_> = ranking.iter().take(config.top_n).cloned().collect();
        for (rank, entry) in flagged.iter().enumerate() {
            info!(
                rank = rank + 1,
                customer = %entry.customer,
                mean_abs_deviation = entry.mean_abs_deviation,
                "趋势偏差较大"
            );
        }

        Ok(TrendReport {
            run_id: Uuid::new_v4().to_string(),
            suffix: horizon.suffix.clone(),
            prognosis_points: prognosis.len(),
            skipped_periods: extracted.skipped_periods,
            plan_period_columns: plan.period_columns,
            plan_skipped_columns: plan.skipped_columns.clone(),
            compared_points: points.len(),
            customers: ranking.len(),
            flagged,
            output_path: output_path.display().to_string(),
            charts_written,
        })
    }
}
