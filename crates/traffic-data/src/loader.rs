//! CSV 측정 데이터 로더.
//!
//! 헤더 검증 → 원시 행 파싱 → 결측 처리 순서로 검증된 `TrafficRecord` 목록을 만듭니다.
//! 필수 컬럼 외의 컬럼(예: `city`)은 무시합니다.

use csv::{ReaderBuilder, StringRecord, Trim};
use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};
use traffic_core::{TrafficError, TrafficRecord, TrafficResult, SECONDS_PER_DAY};

use crate::imputation::handle_missing_values;

/// 입력 CSV에 반드시 있어야 하는 컬럼.
pub const REQUIRED_COLUMNS: [&str; 6] = ["day", "interval", "detid", "flow", "occ", "speed"];

/// 결측 처리 전의 원시 행.
///
/// 빈 셀이나 숫자로 읽을 수 없는 값은 `None`이 됩니다.
/// `inf`/`NaN` 문자열은 비유한 실수로 그대로 읽습니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTrafficRow {
    pub day: Option<String>,
    pub interval: Option<u32>,
    pub detid: Option<i64>,
    pub flow: Option<f64>,
    pub occ: Option<f64>,
    pub speed: Option<f64>,
}

/// 헤더에 필수 컬럼이 모두 있는지 확인합니다.
///
/// 누락된 컬럼을 모두 담아 `MissingColumns`를 반환합니다.
pub fn validate_columns<S: AsRef<str>>(headers: &[S]) -> TrafficResult<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h.as_ref().trim() == **required))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(TrafficError::MissingColumns(missing))
    }
}

/// 필수 컬럼의 위치.
struct ColumnIndex {
    day: usize,
    interval: usize,
    detid: usize,
    flow: usize,
    occ: usize,
    speed: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> TrafficResult<Self> {
        let names: Vec<&str> = headers.iter().collect();
        validate_columns(&names)?;

        let position = |name: &str| -> TrafficResult<usize> {
            names
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| TrafficError::MissingColumns(vec![name.to_string()]))
        };

        Ok(Self {
            day: position("day")?,
            interval: position("interval")?,
            detid: position("detid")?,
            flow: position("flow")?,
            occ: position("occ")?,
            speed: position("speed")?,
        })
    }
}

fn field<'a>(record: &'a StringRecord, idx: usize) -> Option<&'a str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_float(value: Option<&str>) -> Option<f64> {
    value.and_then(|s| s.parse::<f64>().ok())
}

/// 정수 또는 정수값 실수("300.0")를 허용합니다.
fn parse_integral(value: Option<&str>) -> Option<i64> {
    let s = value?;
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Some(v as i64),
        _ => None,
    }
}

fn parse_interval(value: Option<&str>) -> Option<u32> {
    parse_integral(value)
        .filter(|v| (0..SECONDS_PER_DAY as i64).contains(v))
        .map(|v| v as u32)
}

/// reader에서 원시 행을 읽습니다.
pub fn read_raw_csv<R: Read>(reader: R) -> TrafficResult<Vec<RawTrafficRow>> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut rows = Vec::new();
    let mut dropped_intervals = 0usize;
    for result in rdr.records() {
        let record = result?;

        let interval_raw = field(&record, columns.interval);
        let interval = parse_interval(interval_raw);
        if interval_raw.is_some() && interval.is_none() {
            dropped_intervals += 1;
        }

        rows.push(RawTrafficRow {
            day: field(&record, columns.day).map(str::to_string),
            interval,
            detid: parse_integral(field(&record, columns.detid)),
            flow: parse_float(field(&record, columns.flow)),
            occ: parse_float(field(&record, columns.occ)),
            speed: parse_float(field(&record, columns.speed)),
        });
    }

    if dropped_intervals > 0 {
        warn!(
            count = dropped_intervals,
            "interval 값이 0-86399 범위의 정수가 아니어서 결측으로 처리함"
        );
    }
    debug!(rows = rows.len(), "CSV 원시 행 파싱 완료");

    Ok(rows)
}

/// 파일에서 원시 행을 읽습니다.
pub fn load_raw_csv<P: AsRef<Path>>(path: P) -> TrafficResult<Vec<RawTrafficRow>> {
    let file = File::open(path.as_ref())?;
    read_raw_csv(file)
}

/// 레코드 중 `fraction` 비율만큼 시드 기반으로 비복원 추출합니다.
///
/// 추출된 행은 원래 순서를 유지합니다. 추출 크기는 `floor(n * fraction)`이며
/// 입력이 비어있지 않으면 최소 1행입니다.
pub fn sample_records(records: Vec<TrafficRecord>, fraction: f64, seed: u64) -> Vec<TrafficRecord> {
    let n = records.len();
    if n == 0 || fraction >= 1.0 {
        return records;
    }

    let amount = ((n as f64 * fraction).floor() as usize).clamp(1, n);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut picked = index::sample(&mut rng, n, amount).into_vec();
    picked.sort_unstable();

    let mut keep = vec![false; n];
    for i in picked {
        keep[i] = true;
    }

    records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, k)| k.then_some(record))
        .collect()
}

/// 검증된 교통 레코드 로더.
#[derive(Debug, Clone, Default)]
pub struct TrafficDataLoader {
    sample_fraction: Option<f64>,
    sample_seed: u64,
}

impl TrafficDataLoader {
    /// 전체 데이터를 사용하는 로더 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 설정의 데이터 섹션으로 로더 생성.
    pub fn from_config(config: &traffic_core::DataConfig) -> Self {
        Self {
            sample_fraction: config.sample_fraction,
            sample_seed: config.sample_seed,
        }
    }

    /// 로드 후 일부만 추출하도록 설정.
    pub fn with_sampling(mut self, fraction: f64, seed: u64) -> Self {
        self.sample_fraction = Some(fraction);
        self.sample_seed = seed;
        self
    }

    /// CSV 파일을 읽어 검증된 레코드를 반환합니다.
    pub fn load_csv<P: AsRef<Path>>(&self, path: P) -> TrafficResult<Vec<TrafficRecord>> {
        let path = path.as_ref();
        info!(path = %path.display(), "교통 CSV 로드 시작");
        let file = File::open(path)
            .map_err(|e| TrafficError::Io(format!("{}: {}", path.display(), e)))?;
        self.load_reader(file)
    }

    /// 임의의 reader에서 검증된 레코드를 읽습니다.
    pub fn load_reader<R: Read>(&self, reader: R) -> TrafficResult<Vec<TrafficRecord>> {
        let raw = read_raw_csv(reader)?;
        let mut records = handle_missing_values(&raw)?;

        if let Some(fraction) = self.sample_fraction {
            let before = records.len();
            records = sample_records(records, fraction, self.sample_seed);
            info!(before, after = records.len(), fraction, "로드 데이터 샘플링");
        }

        info!(rows = records.len(), "교통 데이터 로드 완료");
        Ok(records)
    }
}
