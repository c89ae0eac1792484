// ==========================================
// 预测对账系统 - 数据概况 API
// ==========================================
// 缺失值统计 → 剔除无物料名称的行 → 物料交付量排名 → 写出
// ==========================================

use crate::api::error::ApiResult;
use crate::config::ProfileConfig;
use crate::domain::profile::ProfileReport;
use crate::engine::DataProfiler;
use crate::exporter::ArticleRankingWriter;
use crate::importer::{ImportError, SchemaValidator, UniversalFileParser};
use tracing::{error, info, instrument};
use uuid::Uuid;

#[derive(Default)]
pub struct ProfileApi;

impl ProfileApi {
    #[instrument(skip(self, config), fields(input = %config.input_path.display()))]
    pub fn run(&self, config: &ProfileConfig) -> ApiResult<ProfileReport> {
        let result = self.run_inner(config);
        if let Err(e) = &result {
            error!(error = %e, "数据概况失败");
        }
        result
    }

    fn run_inner(&self, config: &ProfileConfig) -> ApiResult<ProfileReport> {
        config.validate()?;

        let sheet = UniversalFileParser.parse(&config.input_path)?;
        let required = vec![
            config.article_column.clone(),
            config.name_column.clone(),
            config.delivered_column.clone(),
        ];
        let resolution = SchemaValidator.resolve(&sheet.headers, &required)?;
        let column = |name: &str| {
            resolution
                .actual(name)
                .map(str::to_string)
                .ok_or_else(|| ImportError::MissingExpectedColumns {
                    missing: vec![name.to_string()],
                    available: sheet.headers.clone(),
                })
        };
        let article_column = column(&config.article_column)?;
        let name_column = column(&config.name_column)?;
        let delivered_column = column(&config.delivered_column)?;

        let missing_counts = DataProfiler.missing_counts(&sheet);
        for count in missing_counts.iter().filter(|c| c.missing > 0) {
            info!(column = %count.column, missing = count.missing, "缺失值");
        }

        let (rows, rows_without_name) = DataProfiler.drop_missing(&sheet, &name_column);
        info!(kept = rows.len(), dropped = rows_without_name, "已剔除无物料名称的行");

        let articles =
            DataProfiler.article_ranking(&rows, &article_column, &name_column, &delivered_column);

        let output_path = config.output_path();
        ArticleRankingWriter.write(&output_path, &articles, &missing_counts)?;

        Ok(ProfileReport {
            run_id: Uuid::new_v4().to_string(),
            input_rows: sheet.row_count(),
            rows_without_name,
            missing_counts,
            articles: articles.len(),
            output_path: output_path.display().to_string(),
        })
    }
}
