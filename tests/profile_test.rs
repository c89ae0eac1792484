// ==========================================
// 数据概况集成测试
// ==========================================

mod test_helpers;

use forecast_recon::api::ProfileApi;
use forecast_recon::config::ProfileConfig;
use forecast_recon::logging;
use test_helpers::{sheet_names, write_lines};

#[test]
fn test_profile_ranks_delivered_articles() {
    logging::init_test();
    let dir = tempfile::tempdir().unwrap();

    let input = write_lines(
        dir.path(),
        "Rohdaten.csv",
        &[
            "matnr,Baumarktartikel,bedmo_mg,werk",
            "A1,Spaten,10,W1",
            "A2,Rechen,40,",
            "A1,Spaten,25,W2",
            "A3,,99,W1",
        ],
    );

    let report = ProfileApi
        .run(&ProfileConfig {
            input_path: input,
            output_dir: dir.path().to_path_buf(),
            output_file: "ranking.csv".to_string(),
            ..ProfileConfig::default()
        })
        .unwrap();

    assert_eq!(report.input_rows, 4);
    assert_eq!(report.rows_without_name, 1);
    assert_eq!(report.articles, 2);
    let werk = report
        .missing_counts
        .iter()
        .find(|c| c.column == "werk")
        .unwrap();
    assert_eq!(werk.missing, 1);

    let mut reader = csv::Reader::from_path(dir.path().join("ranking.csv")).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(&rows[0][0], "A2");
    assert_eq!(&rows[1][0], "A1");
    assert_eq!(&rows[1][2], "35.0");
}

#[test]
fn test_profile_default_workbook_output() {
    logging::init_test();
    let dir = tempfile::tempdir().unwrap();

    let input = write_lines(
        dir.path(),
        "Rohdaten.csv",
        &["MATNR,BAUMARKTARTIKEL,BEDMO_MG", "A1,Spaten,10"],
    );

    let report = ProfileApi
        .run(&ProfileConfig {
            input_path: input,
            output_dir: dir.path().to_path_buf(),
            ..ProfileConfig::default()
        })
        .unwrap();

    assert_eq!(report.articles, 1);
    let output = dir.path().join("Artikel_Liefermengen_sortiert.xlsx");
    assert_eq!(sheet_names(&output), vec!["Artikel", "Fehlende Werte"]);
}
