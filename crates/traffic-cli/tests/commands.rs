//! 명령어 흐름 테스트 (임시 CSV 사용).

use std::fmt::Write as _;
use std::path::PathBuf;

use traffic_analytics::PredictionQuery;
use traffic_cli::commands::analyze::{self, AnalyzeConfig};
use traffic_cli::commands::common::{is_input_error, FilterArgs};
use traffic_cli::commands::correlation::{self, CorrelationConfig};
use traffic_cli::commands::predict::{self, PredictConfig};
use traffic_cli::commands::stats::{self, StatsConfig};
use traffic_cli::commands::train::{self, TrainConfig};
use traffic_core::AppConfig;

fn workspace(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("traffic-cli-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_csv(dir: &PathBuf) -> PathBuf {
    let mut csv = String::from("day,interval,detid,flow,occ,speed,city\n");
    for day in ["2016-09-26", "2016-10-01"] {
        for detid in [230, 231] {
            for i in 0..60u32 {
                let flow = 50.0 + (i % 12) as f64 * 20.0 + if detid == 231 { 15.0 } else { 0.0 };
                let occ = 2.0 + (i % 12) as f64;
                let speed = 100.0 - (i % 12) as f64 * 4.0;
                writeln!(csv, "{},{},{},{},{},{},torino", day, i * 900, detid, flow, occ, speed).unwrap();
            }
        }
    }
    let path = dir.join("traffic.csv");
    std::fs::write(&path, csv).unwrap();
    path
}

fn app_config(dir: &PathBuf) -> AppConfig {
    let mut app = AppConfig::default();
    app.model.n_estimators = 10;
    app.model.model_path = dir.join("model.json");
    app
}

#[test]
fn test_stats_with_filter() {
    let dir = workspace("stats");
    let input = Some(write_csv(&dir));
    let app = app_config(&dir);

    let all = stats::run(&StatsConfig { input: input.clone(), filter: FilterArgs::default() }, &app).unwrap();
    assert_eq!(all.row_count, 240);
    assert_eq!(all.detector_count, 2);

    let filter = FilterArgs {
        detid: Some(230),
        start_date: Some("2016-09-27".to_string()),
        ..Default::default()
    };
    let filtered = stats::run(&StatsConfig { input, filter }, &app).unwrap();
    assert_eq!(filtered.row_count, 60);
    assert_eq!(filtered.detector_count, 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_analyze() {
    let dir = workspace("analyze");
    let app = app_config(&dir);
    let output = analyze::run(
        &AnalyzeConfig {
            input: Some(write_csv(&dir)),
            filter: FilterArgs::default(),
        },
        &app,
    )
    .unwrap();

    assert_eq!(output.summary.total_records, 240);
    assert_eq!(output.report.peak_hours.len(), 5);
    let days: Vec<&str> = output.report.daily_congestion.iter().map(|d| d.day.as_str()).collect();
    assert_eq!(days, vec!["Mon", "Sat"]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_train_predict_correlation() {
    let dir = workspace("train");
    let input = Some(write_csv(&dir));
    let app = app_config(&dir);

    let trained = train::run(&TrainConfig { input: input.clone(), output: None }, &app).unwrap();
    assert_eq!(trained.metrics.total_size, 240);
    assert_eq!(trained.feature_importance.len(), 13);
    assert!(trained.model_path.exists());

    // 중요도는 내림차순 키 순서를 가진 JSON 객체
    let json = serde_json::to_value(&trained).unwrap();
    let importance = json["feature_importance"].as_object().unwrap();
    assert_eq!(importance.len(), 13);
    let values: Vec<f64> = importance.values().map(|v| v.as_f64().unwrap()).collect();
    assert!(values.windows(2).all(|w| w[0] >= w[1]), "{:?}", values);
    let keys: Vec<&str> = importance.keys().map(String::as_str).collect();
    let ranked: Vec<&str> = trained.feature_importance.iter().map(|(name, _)| name).collect();
    assert_eq!(keys, ranked);

    let outcome = predict::run(
        &PredictConfig {
            input: input.clone(),
            model: None,
            query: PredictionQuery::new(8, 0, 230),
        },
        &app,
    )
    .unwrap();
    assert!(outcome.confidence_low <= outcome.prediction);
    assert!(outcome.prediction <= outcome.confidence_high);
    assert!((0.0..=100.0).contains(&outcome.traffic_index));

    let correlations = correlation::run(
        &CorrelationConfig {
            input,
            target: "flow".to_string(),
        },
        &app,
    )
    .unwrap();
    assert!(!correlations.is_empty());
    assert!(correlations.iter().all(|(name, _)| name != "flow"));

    let json = serde_json::to_value(&correlations).unwrap();
    let by_column = json.as_object().unwrap();
    assert_eq!(by_column.len(), correlations.len());
    let magnitudes: Vec<f64> = by_column.values().map(|v| v.as_f64().unwrap().abs()).collect();
    assert!(magnitudes.windows(2).all(|w| w[0] >= w[1]), "{:?}", magnitudes);

    let bad_hour = predict::run(
        &PredictConfig {
            input: Some(dir.join("traffic.csv")),
            model: None,
            query: PredictionQuery::new(30, 0, 230),
        },
        &app,
    )
    .unwrap_err();
    assert!(is_input_error(&bad_hour));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_input_is_error() {
    let dir = workspace("missing");
    let app = app_config(&dir);
    let err = stats::run(
        &StatsConfig {
            input: Some(dir.join("nope.csv")),
            filter: FilterArgs::default(),
        },
        &app,
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("nope.csv"));

    let no_model = predict::run(
        &PredictConfig {
            input: None,
            model: Some(dir.join("absent.json")),
            query: PredictionQuery::new(8, 0, 230),
        },
        &app,
    )
    .unwrap_err();
    assert!(!is_input_error(&no_model));

    let _ = std::fs::remove_dir_all(&dir);
}
