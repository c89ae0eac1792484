// ==========================================
// 预测对账系统 - 对账 API
// ==========================================
// 流程: 加载 → 规范化 → 汇总 → 内连接求系数 → 平滑 → 写出
// 红线: 内连接为空时不写任何输出文件
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ReconConfig, TargetSource};
use crate::domain::forecast::{AggregatedActual, ReconcileReport, TargetEntry};
use crate::domain::types::{ForecastKey, TargetSourceKind};
use crate::engine::{Aggregator, FactorCalculator, MonthlySummary, Smoother, TargetSimulator};
use crate::exporter::ReconciliationWriter;
use crate::importer::{ForecastImporter, TargetColumns, TargetImporter};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// 目标计划加载结果
struct LoadedTargets {
    entries: Vec<TargetEntry>,
    kind: TargetSourceKind,
    skipped_rows: usize,
    skipped_records: usize,
    used_csv_fallback: bool,
    lowercased_headers: bool,
}

#[derive(Default)]
pub struct ReconcileApi {
    forecast_importer: ForecastImporter,
    target_importer: TargetImporter,
}

impl ReconcileApi {
    pub fn new(forecast_importer: ForecastImporter, target_importer: TargetImporter) -> Self {
        Self {
            forecast_importer,
            target_importer,
        }
    }

    /// 执行一次完整对账
    #[instrument(skip(self, config), fields(input = %config.input_path.display()))]
    pub fn run(&self, config: &ReconConfig) -> ApiResult<ReconcileReport> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4().to_string();
        info!(run_id = %run_id, "对账开始");

        let result = self.run_inner(config, run_id, started_at);
        if let Err(e) = &result {
            error!(error = %e, "对账失败");
        }
        result
    }

    fn run_inner(
        &self,
        config: &ReconConfig,
        run_id: String,
        started_at: DateTime<Utc>,
    ) -> ApiResult<ReconcileReport> {
        config.validate()?;

        // === 加载 + 规范化 ===
        let forecast = self
            .forecast_importer
            .import(&config.input_path, &config.columns)?;

        // === 汇总 ===
        let actuals = Aggregator.aggregate(&forecast.lines);
        info!(keys = actuals.len(), "预测已按 (客户, 月份) 汇总");

        let targets = self.load_targets(&config.target, &actuals)?;

        // === 内连接求系数 ===
        let factors = FactorCalculator.calculate(&actuals, &targets.entries);
        if factors.is_empty() {
            let target_keys: HashSet<ForecastKey> =
                targets.entries.iter().map(|t| t.key()).collect();
            return Err(ApiError::EmptyJoinResult {
                forecast_keys: actuals.len(),
                target_keys: target_keys.len(),
            });
        }
        let average_factor = FactorCalculator.average_factor(&factors).unwrap_or(1.0);
        info!(
            matched = factors.len(),
            average_factor,
            "系数计算完成"
        );

        // === 平滑 ===
        let smoothed = Smoother.smooth(&forecast.lines, &factors);
        if smoothed.unmatched > 0 {
            warn!(unmatched = smoothed.unmatched, "部分预测行无目标计划,按系数 1.0 透传");
        }
        let monthly = MonthlySummary.compare(&smoothed.lines);

        // === 写出 ===
        let output_path = config.output_path();
        let chart_written = ReconciliationWriter::new(config.write_chart).write(
            &output_path,
            &smoothed.lines,
            &monthly,
        )?;

        let original_total: f64 = smoothed.lines.iter().map(|l| l.quantity).sum();
        let smoothed_total: i64 = smoothed.lines.iter().map(|l| l.smoothed_quantity).sum();
        let elapsed_ms = (Utc::now() - started_at).num_milliseconds();

        let skipped_records = forecast.skipped_records + targets.skipped_records;
        if skipped_records > 0 || targets.skipped_rows > 0 {
            warn!(
                skipped_records,
                skipped_target_rows = targets.skipped_rows,
                "部分输入记录未能读取"
            );
        }

        info!(
            run_id = %run_id,
            rows = smoothed.lines.len(),
            elapsed_ms,
            path = %output_path.display(),
            "对账完成"
        );

        Ok(ReconcileReport {
            run_id,
            started_at,
            elapsed_ms,
            input_rows: forecast.input_rows,
            dropped_rows: forecast.dropped_rows,
            skipped_records,
            forecast_lines: forecast.lines.len(),
            target_source: targets.kind,
            target_entries: targets.entries.len(),
            skipped_target_rows: targets.skipped_rows,
            matched_keys: factors.len(),
            unmatched_lines: smoothed.unmatched,
            average_factor,
            original_total,
            smoothed_total,
            output_path: output_path.display().to_string(),
            chart_written,
            used_csv_fallback: forecast.used_csv_fallback || targets.used_csv_fallback,
            lowercased_headers: forecast.lowercased_headers || targets.lowercased_headers,
        })
    }

    fn load_targets(
        &self,
        source: &TargetSource,
        actuals: &[AggregatedActual],
    ) -> ApiResult<LoadedTargets> {
        match source {
            TargetSource::Simulated {
                seed,
                noise_min,
                noise_max,
            } => Ok(LoadedTargets {
                entries: TargetSimulator::new(*seed, *noise_min, *noise_max).simulate(actuals),
                kind: TargetSourceKind::Simulated,
                skipped_rows: 0,
                skipped_records: 0,
                used_csv_fallback: false,
                lowercased_headers: false,
            }),
            TargetSource::File {
                path,
                customer_column,
                month_column,
                target_column,
            } => {
                let columns = TargetColumns {
                    customer: customer_column,
                    month: month_column,
                    target: target_column,
                };
                let import = self.target_importer.import(path, columns)?;
                Ok(LoadedTargets {
                    entries: import.entries,
                    kind: TargetSourceKind::File,
                    skipped_rows: import.skipped_rows,
                    skipped_records: import.skipped_records,
                    used_csv_fallback: import.used_csv_fallback,
                    lowercased_headers: import.lowercased_headers,
                })
            }
        }
    }
}
