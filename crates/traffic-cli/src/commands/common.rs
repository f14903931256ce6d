//! 명령어 공통 인자와 입력 처리.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use traffic_analytics::MlError;
use traffic_core::{parse_day, AppConfig, TrafficError, TrafficFilter, TrafficRecord};
use traffic_data::TrafficDataLoader;

/// 행 필터 인자.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// 시작 날짜 (YYYY-MM-DD, 포함)
    #[arg(long)]
    pub start_date: Option<String>,

    /// 종료 날짜 (YYYY-MM-DD, 포함)
    #[arg(long)]
    pub end_date: Option<String>,

    /// 검지기 ID
    #[arg(long)]
    pub detid: Option<i64>,

    /// 시작 시각 (0-23, 포함)
    #[arg(long)]
    pub hour_start: Option<u32>,

    /// 종료 시각 (0-23, 포함)
    #[arg(long)]
    pub hour_end: Option<u32>,
}

impl FilterArgs {
    /// 인자를 도메인 필터로 변환합니다.
    pub fn to_filter(&self) -> Result<TrafficFilter> {
        let parse = |value: &Option<String>| -> Result<_> {
            value
                .as_deref()
                .map(parse_day)
                .transpose()
                .map_err(|e| anyhow!("날짜 필터 오류: {}", e))
        };

        let mut filter = TrafficFilter::new()
            .with_dates(parse(&self.start_date)?, parse(&self.end_date)?)
            .with_hours(self.hour_start, self.hour_end);
        if let Some(detid) = self.detid {
            filter = filter.with_detid(detid);
        }
        Ok(filter)
    }
}

/// 입력 CSV 경로를 결정합니다 (인자 → 설정 순).
pub fn resolve_input(input: Option<&Path>, config: &AppConfig) -> Result<PathBuf> {
    input
        .map(Path::to_path_buf)
        .or_else(|| config.data.csv_path.clone())
        .ok_or_else(|| anyhow!("입력 CSV가 필요합니다 (--input 또는 data.csv_path)"))
}

/// 설정의 샘플링 옵션을 적용해 레코드를 로드합니다.
pub fn load_records(input: Option<&Path>, config: &AppConfig) -> Result<Vec<TrafficRecord>> {
    let path = resolve_input(input, config)?;
    TrafficDataLoader::from_config(&config.data)
        .load_csv(&path)
        .with_context(|| format!("데이터 로드 실패: {}", path.display()))
}

/// 순위가 매겨진 `이름 → 값` 목록. 순서를 유지한 JSON 객체로 직렬화됩니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedValues(pub Vec<(String, f64)>);

impl RankedValues {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl From<Vec<(String, f64)>> for RankedValues {
    fn from(entries: Vec<(String, f64)>) -> Self {
        Self(entries)
    }
}

impl Serialize for RankedValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, value)| (name, value)))
    }
}

/// 입력을 고치면 해결되는 에러인지 확인합니다 (context 체인 전체를 검사).
pub fn is_input_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<MlError>()
            .is_some_and(MlError::is_recoverable)
            || cause
                .downcast_ref::<TrafficError>()
                .is_some_and(TrafficError::is_input_error)
    })
}

/// 값을 보기 좋은 JSON으로 출력합니다.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_args_conversion() {
        let args = FilterArgs {
            start_date: Some("2016-09-01".to_string()),
            detid: Some(230),
            hour_end: Some(9),
            ..Default::default()
        };
        let filter = args.to_filter().unwrap();
        assert_eq!(filter.start_date.unwrap().to_string(), "2016-09-01");
        assert_eq!(filter.end_date, None);
        assert_eq!(filter.detid, Some(230));
        assert_eq!(filter.hour_end, Some(9));

        assert!(FilterArgs::default().to_filter().unwrap().is_empty());
    }

    #[test]
    fn test_filter_args_bad_date() {
        let args = FilterArgs {
            end_date: Some("09/30/2016".to_string()),
            ..Default::default()
        };
        assert!(args.to_filter().is_err());
    }

    #[test]
    fn test_ranked_values_serialize_as_ordered_object() {
        let ranked = RankedValues::from(vec![
            ("speed".to_string(), 0.6),
            ("hour".to_string(), 0.3),
            ("detid".to_string(), 0.1),
        ]);
        assert_eq!(
            serde_json::to_string(&ranked).unwrap(),
            r#"{"speed":0.6,"hour":0.3,"detid":0.1}"#
        );
        assert_eq!(serde_json::to_string(&RankedValues::default()).unwrap(), "{}");
    }

    #[test]
    fn test_is_input_error() {
        let bad_feature = anyhow::Error::from(MlError::InvalidFeatureInput("hour".to_string()));
        assert!(is_input_error(&bad_feature));

        let bad_query = Err::<(), _>(MlError::from(TrafficError::InvalidInput("hour".to_string())))
            .context("예측 실패")
            .unwrap_err();
        assert!(is_input_error(&bad_query));

        let missing_columns = Err::<(), _>(TrafficError::MissingColumns(vec!["occ".to_string()]))
            .context("데이터 로드 실패")
            .unwrap_err();
        assert!(is_input_error(&missing_columns));

        let not_trained = Err::<(), _>(MlError::NotTrained).context("예측 실패").unwrap_err();
        assert!(!is_input_error(&not_trained));
        assert!(!is_input_error(&anyhow!("기타 실패")));
    }

    #[test]
    fn test_resolve_input() {
        let mut config = AppConfig::default();
        assert!(resolve_input(None, &config).is_err());

        config.data.csv_path = Some(PathBuf::from("data/traffic.csv"));
        assert_eq!(resolve_input(None, &config).unwrap(), PathBuf::from("data/traffic.csv"));
        assert_eq!(
            resolve_input(Some(Path::new("other.csv")), &config).unwrap(),
            PathBuf::from("other.csv")
        );
    }
}
