// ==========================================
// 预测对账系统 - 应用配置
// ==========================================
// 职责: 配置加载、默认值、取值校验
// 红线: 管道入口只接收显式传入的配置结构,不读全局常量
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 默认配置文件名（当前工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "forecast_recon.json";

// ==========================================
// AppConfig - 顶层配置
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub reconcile: ReconConfig,

    #[serde(default)]
    pub trend: TrendConfig,

    #[serde(default)]
    pub profile: ProfileConfig,
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    ///
    /// # 返回
    /// - 文件不存在: 内置默认值
    /// - 文件存在但无法解析: ConfigError::Parse
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "配置文件不存在,使用默认配置");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: AppConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        config.validate()?;
        debug!(path = %path.display(), "配置文件加载完成");
        Ok(config)
    }

    /// 校验所有子配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.reconcile.validate()?;
        self.trend.validate()?;
        self.profile.validate()?;
        Ok(())
    }
}

// ==========================================
// ForecastColumns - 预测源表列名
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastColumns {
    /// 物料号列
    #[serde(default = "default_article_column")]
    pub article: String,

    /// 客户/工厂列
    #[serde(default = "default_customer_column")]
    pub customer: String,

    /// 第一预测期月份列
    #[serde(default = "default_month_column")]
    pub month: String,

    /// 第一预测期数量列
    #[serde(default = "default_quantity_column")]
    pub quantity: String,

    /// 第二预测期月份列（可选,两列都存在时才追加）
    #[serde(default = "default_second_month_column")]
    pub second_month: Option<String>,

    /// 第二预测期数量列（可选）
    #[serde(default = "default_second_quantity_column")]
    pub second_quantity: Option<String>,
}

impl Default for ForecastColumns {
    fn default() -> Self {
        Self {
            article: default_article_column(),
            customer: default_customer_column(),
            month: default_month_column(),
            quantity: default_quantity_column(),
            second_month: default_second_month_column(),
            second_quantity: default_second_quantity_column(),
        }
    }
}

impl ForecastColumns {
    /// 必需列（按校验顺序）
    pub fn required(&self) -> Vec<String> {
        vec![
            self.article.clone(),
            self.customer.clone(),
            self.month.clone(),
            self.quantity.clone(),
        ]
    }
}

// ==========================================
// TargetSource - 目标计划来源
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetSource {
    /// 基于预测汇总 + 固定种子噪声模拟演示计划
    Simulated {
        #[serde(default = "default_seed")]
        seed: u64,
        #[serde(default = "default_noise_min")]
        noise_min: f64,
        #[serde(default = "default_noise_max")]
        noise_max: f64,
    },

    /// 外部目标计划文件
    File {
        path: PathBuf,
        #[serde(default = "default_target_customer_column")]
        customer_column: String,
        #[serde(default = "default_target_month_column")]
        month_column: String,
        #[serde(default = "default_target_quantity_column")]
        target_column: String,
    },
}

impl Default for TargetSource {
    fn default() -> Self {
        TargetSource::Simulated {
            seed: default_seed(),
            noise_min: default_noise_min(),
            noise_max: default_noise_max(),
        }
    }
}

// ==========================================
// ReconConfig - 预测平滑配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconConfig {
    #[serde(default = "default_recon_input")]
    pub input_path: PathBuf,

    #[serde(default = "default_recon_output_dir")]
    pub output_dir: PathBuf,

    /// 输出文件名,扩展名决定格式 (.xlsx / .csv)
    #[serde(default = "default_recon_output_file")]
    pub output_file: String,

    #[serde(default)]
    pub columns: ForecastColumns,

    #[serde(default)]
    pub target: TargetSource,

    /// 是否在 .xlsx 输出中写入月度对比图
    #[serde(default = "default_true")]
    pub write_chart: bool,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            input_path: default_recon_input(),
            output_dir: default_recon_output_dir(),
            output_file: default_recon_output_file(),
            columns: ForecastColumns::default(),
            target: TargetSource::default(),
            write_chart: true,
        }
    }
}

impl ReconConfig {
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        ensure_not_blank("reconcile.output_file", &self.output_file)?;
        for column in self.columns.required() {
            ensure_not_blank("reconcile.columns", &column)?;
        }

        match &self.target {
            TargetSource::Simulated {
                noise_min,
                noise_max,
                ..
            } => {
                if !(*noise_min >= 0.0 && noise_min < noise_max && noise_max.is_finite()) {
                    return Err(ConfigError::Invalid(format!(
                        "噪声区间无效: [{}, {})",
                        noise_min, noise_max
                    )));
                }
            }
            TargetSource::File {
                customer_column,
                month_column,
                target_column,
                ..
            } => {
                ensure_not_blank("reconcile.target.customer_column", customer_column)?;
                ensure_not_blank("reconcile.target.month_column", month_column)?;
                ensure_not_blank("reconcile.target.target_column", target_column)?;
            }
        }
        Ok(())
    }
}

// ==========================================
// TrendHorizon - 单个预测期的列定义
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendHorizon {
    pub period_column: String,
    pub quantity_column: String,
    /// 输出文件后缀 (如 _prog1)
    pub suffix: String,
}

// ==========================================
// TrendConfig - 趋势偏差分析配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    #[serde(default = "default_trend_raw_data")]
    pub raw_data_path: PathBuf,

    /// 销售计划交叉表
    #[serde(default = "default_trend_plan")]
    pub plan_path: PathBuf,

    #[serde(default = "default_trend_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_trend_customer_column")]
    pub customer_column: String,

    #[serde(default = "default_trend_horizons")]
    pub horizons: Vec<TrendHorizon>,

    /// 标记偏差最大的客户数
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            raw_data_path: default_trend_raw_data(),
            plan_path: default_trend_plan(),
            output_dir: default_trend_output_dir(),
            customer_column: default_trend_customer_column(),
            horizons: default_trend_horizons(),
            top_n: default_top_n(),
        }
    }
}

impl TrendConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        ensure_not_blank("trend.customer_column", &self.customer_column)?;
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("trend.top_n 必须大于 0".to_string()));
        }
        if self.horizons.is_empty() {
            return Err(ConfigError::Invalid("trend.horizons 不能为空".to_string()));
        }
        for horizon in &self.horizons {
            ensure_not_blank("trend.horizons.period_column", &horizon.period_column)?;
            ensure_not_blank("trend.horizons.quantity_column", &horizon.quantity_column)?;
        }
        Ok(())
    }
}

// ==========================================
// ProfileConfig - 数据概况配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_profile_input")]
    pub input_path: PathBuf,

    #[serde(default = "default_profile_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_profile_output_file")]
    pub output_file: String,

    #[serde(default = "default_article_column")]
    pub article_column: String,

    /// 物料名称列,为空的行在排名前剔除
    #[serde(default = "default_profile_name_column")]
    pub name_column: String,

    /// 实际交付量列
    #[serde(default = "default_profile_delivered_column")]
    pub delivered_column: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            input_path: default_profile_input(),
            output_dir: default_profile_output_dir(),
            output_file: default_profile_output_file(),
            article_column: default_article_column(),
            name_column: default_profile_name_column(),
            delivered_column: default_profile_delivered_column(),
        }
    }
}

impl ProfileConfig {
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        ensure_not_blank("profile.output_file", &self.output_file)?;
        ensure_not_blank("profile.article_column", &self.article_column)?;
        ensure_not_blank("profile.name_column", &self.name_column)?;
        ensure_not_blank("profile.delivered_column", &self.delivered_column)?;
        Ok(())
    }
}

fn ensure_not_blank(key: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{} 不能为空", key)));
    }
    Ok(())
}

// ==========================================
// 默认值
// ==========================================

fn default_true() -> bool {
    true
}

fn default_article_column() -> String {
    "matnr".to_string()
}

fn default_customer_column() -> String {
    "werk".to_string()
}

fn default_month_column() -> String {
    "progmo".to_string()
}

fn default_quantity_column() -> String {
    "prog_mg1".to_string()
}

fn default_second_month_column() -> Option<String> {
    Some("progmo2".to_string())
}

fn default_second_quantity_column() -> Option<String> {
    Some("prog_mg2".to_string())
}

fn default_seed() -> u64 {
    42
}

fn default_noise_min() -> f64 {
    0.9
}

fn default_noise_max() -> f64 {
    1.25
}

fn default_target_customer_column() -> String {
    "Kunde".to_string()
}

fn default_target_month_column() -> String {
    "Monat".to_string()
}

fn default_target_quantity_column() -> String {
    "Ziel_Summe".to_string()
}

fn default_recon_input() -> PathBuf {
    PathBuf::from("final.xlsx")
}

fn default_recon_output_dir() -> PathBuf {
    PathBuf::from("./output/final")
}

fn default_recon_output_file() -> String {
    "Live_Forecast_Result.xlsx".to_string()
}

fn default_trend_raw_data() -> PathBuf {
    PathBuf::from("rohdaten.xlsx")
}

fn default_trend_plan() -> PathBuf {
    PathBuf::from("BAUMARKTPROGRAMM.xlsx")
}

fn default_trend_output_dir() -> PathBuf {
    PathBuf::from("./output/plots/2")
}

fn default_trend_customer_column() -> String {
    "Baumarkt".to_string()
}

fn default_trend_horizons() -> Vec<TrendHorizon> {
    vec![
        TrendHorizon {
            period_column: "progmo".to_string(),
            quantity_column: "prog_mg1".to_string(),
            suffix: "_prog1".to_string(),
        },
        TrendHorizon {
            period_column: "progmo2".to_string(),
            quantity_column: "prog_mg2".to_string(),
            suffix: "_prog2".to_string(),
        },
    ]
}

fn default_top_n() -> usize {
    5
}

fn default_profile_input() -> PathBuf {
    PathBuf::from("Rohdaten.xlsx")
}

fn default_profile_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

fn default_profile_output_file() -> String {
    "Artikel_Liefermengen_sortiert.xlsx".to_string()
}

fn default_profile_name_column() -> String {
    "Baumarktartikel".to_string()
}

fn default_profile_delivered_column() -> String {
    "bedmo_mg".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_source_layout() {
        let config = AppConfig::default();
        assert_eq!(
            config.reconcile.columns.required(),
            vec!["matnr", "werk", "progmo", "prog_mg1"]
        );
        assert_eq!(
            config.reconcile.output_path(),
            PathBuf::from("./output/final/Live_Forecast_Result.xlsx")
        );
        match config.reconcile.target {
            TargetSource::Simulated { seed, noise_min, noise_max } => {
                assert_eq!(seed, 42);
                assert_eq!(noise_min, 0.9);
                assert_eq!(noise_max, 1.25);
            }
            TargetSource::File { .. } => panic!("默认应为模拟计划"),
        }
        assert_eq!(config.trend.horizons.len(), 2);
        assert_eq!(config.trend.top_n, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load("definitely_missing_config.json").unwrap();
        assert_eq!(config.reconcile.output_file, "Live_Forecast_Result.xlsx");
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "reconcile": {{
                    "input_path": "in.csv",
                    "output_file": "out.csv",
                    "target": {{ "kind": "FILE", "path": "plan.csv" }}
                }},
                "trend": {{ "top_n": 3 }}
            }}"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.reconcile.input_path, PathBuf::from("in.csv"));
        assert_eq!(config.reconcile.columns.customer, "werk");
        match &config.reconcile.target {
            TargetSource::File { path, target_column, .. } => {
                assert_eq!(path, &PathBuf::from("plan.csv"));
                assert_eq!(target_column, "Ziel_Summe");
            }
            TargetSource::Simulated { .. } => panic!("应解析为文件来源"),
        }
        assert_eq!(config.trend.top_n, 3);
        assert_eq!(config.profile.name_column, "Baumarktartikel");
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let result = AppConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_validate_rejects_inverted_noise_range() {
        let mut config = ReconConfig::default();
        config.target = TargetSource::Simulated {
            seed: 1,
            noise_min: 1.5,
            noise_max: 1.0,
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_zero_top_n() {
        let config = TrendConfig {
            top_n: 0,
            ..TrendConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
