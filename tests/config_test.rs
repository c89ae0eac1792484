// ==========================================
// 配置加载集成测试
// ==========================================

use forecast_recon::config::{AppConfig, ConfigError, TargetSource};
use std::fs;

#[test]
fn test_load_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let config = AppConfig::load(dir.path().join("forecast_recon.json")).unwrap();

    assert_eq!(config.reconcile.columns.article, "matnr");
    assert_eq!(config.trend.top_n, 5);
    assert!(matches!(
        config.reconcile.target,
        TargetSource::Simulated { seed: 42, .. }
    ));
}

#[test]
fn test_load_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forecast_recon.json");
    fs::write(
        &path,
        r#"{
            "reconcile": {
                "output_file": "result.csv",
                "target": { "kind": "FILE", "path": "ziel.xlsx" }
            },
            "trend": { "top_n": 3 }
        }"#,
    )
    .unwrap();

    let config = AppConfig::load(&path).unwrap();

    assert_eq!(config.reconcile.output_file, "result.csv");
    assert_eq!(config.reconcile.columns.quantity, "prog_mg1");
    match &config.reconcile.target {
        TargetSource::File { target_column, .. } => assert_eq!(target_column, "Ziel_Summe"),
        other => panic!("unexpected target source: {:?}", other),
    }
    assert_eq!(config.trend.top_n, 3);
    assert_eq!(config.trend.horizons.len(), 2);
}

#[test]
fn test_load_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forecast_recon.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        AppConfig::load(&path),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forecast_recon.json");
    fs::write(&path, r#"{ "trend": { "top_n": 0 } }"#).unwrap();

    assert!(matches!(
        AppConfig::load(&path),
        Err(ConfigError::Invalid(_))
    ));
}
