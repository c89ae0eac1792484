// ==========================================
// 预测对账系统 - 命令行入口
// ==========================================
// 用法: forecast-recon [reconcile|trend|profile] [config.json]
// 退出码: 0 成功 / 1 失败
// ==========================================

use anyhow::{bail, Context, Result};
use forecast_recon::config::{AppConfig, DEFAULT_CONFIG_FILE};
use forecast_recon::{logging, ProfileApi, ReconcileApi, TrendApi, APP_NAME, VERSION};
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Reconcile,
    Trend,
    Profile,
}

impl Command {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "reconcile" => Some(Command::Reconcile),
            "trend" => Some(Command::Trend),
            "profile" => Some(Command::Profile),
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    logging::init();

    info!("{} v{}", APP_NAME, VERSION);

    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Fehler: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<()> {
    let (command, config_path) = match args.as_slice() {
        [] => (Command::Reconcile, DEFAULT_CONFIG_FILE.to_string()),
        [first] => match Command::parse(first) {
            Some(command) => (command, DEFAULT_CONFIG_FILE.to_string()),
            None => (Command::Reconcile, first.clone()),
        },
        [first, second] => match Command::parse(first) {
            Some(command) => (command, second.clone()),
            None => bail!("未知命令: {}（可用: reconcile / trend / profile）", first),
        },
        _ => bail!("用法: forecast-recon [reconcile|trend|profile] [config.json]"),
    };

    let config = AppConfig::load(&config_path)
        .with_context(|| format!("配置加载失败: {}", config_path))?;

    match command {
        Command::Reconcile => {
            let report = ReconcileApi::default().run(&config.reconcile)?;
            info!(
                run_id = %report.run_id,
                lines = report.forecast_lines,
                matched = report.matched_keys,
                unmatched = report.unmatched_lines,
                path = %report.output_path,
                "对账结果已保存"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Trend => {
            let reports = TrendApi::default().run(&config.trend)?;
            for report in &reports {
                info!(suffix = %report.suffix, path = %report.output_path, "趋势分析已保存");
            }
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Command::Profile => {
            let report = ProfileApi.run(&config.profile)?;
            info!(articles = report.articles, path = %report.output_path, "物料排名已保存");
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
