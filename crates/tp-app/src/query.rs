//! Query helpers for extracting data from loaded runs.

use std::fmt::Write as _;
use std::path::Path;

use tp_core::lerp;
use tp_results::{EventRecord, TimeseriesRecord};

use crate::error::{AppError, AppResult};

/// Summary of a run's time range and temperatures.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub time_range: (f64, f64),
    pub record_count: usize,
    pub start_temperature_c: f64,
    pub final_temperature_c: f64,
    pub min_temperature_c: f64,
    pub max_temperature_c: f64,
}

/// Get run summary from timeseries records.
pub fn get_run_summary(records: &[TimeseriesRecord]) -> AppResult<RunSummary> {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return Err(AppError::InvalidInput("No records in run".to_string()));
    };

    let (min_temperature_c, max_temperature_c) = records.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), r| (lo.min(r.temperature_c), hi.max(r.temperature_c)),
    );

    Ok(RunSummary {
        time_range: (first.time_s, last.time_s),
        record_count: records.len(),
        start_temperature_c: first.temperature_c,
        final_temperature_c: last.temperature_c,
        min_temperature_c,
        max_temperature_c,
    })
}

/// First time the series reaches `temperature_c`, interpolated between the
/// two samples that bracket the crossing.
pub fn time_to_reach(records: &[TimeseriesRecord], temperature_c: f64) -> Option<f64> {
    let first = records.first()?;
    if first.temperature_c >= temperature_c {
        return Some(first.time_s);
    }
    records.windows(2).find_map(|pair| {
        let (a, b) = (pair[0], pair[1]);
        if a.temperature_c < temperature_c && b.temperature_c >= temperature_c {
            let fraction = (temperature_c - a.temperature_c) / (b.temperature_c - a.temperature_c);
            Some(lerp(a.time_s, b.time_s, fraction))
        } else {
            None
        }
    })
}

/// Temperature at `time_s`, interpolated between samples.
pub fn temperature_at(records: &[TimeseriesRecord], time_s: f64) -> AppResult<f64> {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return Err(AppError::InvalidInput("No records in run".to_string()));
    };
    if time_s < first.time_s || time_s > last.time_s {
        return Err(AppError::InvalidInput(format!(
            "time {} s outside run range {}..{} s",
            time_s, first.time_s, last.time_s
        )));
    }

    let idx = records.partition_point(|r| r.time_s < time_s);
    let b = records[idx];
    if idx == 0 || b.time_s == time_s {
        return Ok(b.temperature_c);
    }
    let a = records[idx - 1];
    let fraction = (time_s - a.time_s) / (b.time_s - a.time_s);
    Ok(lerp(a.temperature_c, b.temperature_c, fraction))
}

/// Events of one kind (`ice_added`, `melting_started`, ...), or all of them.
pub fn filter_events<'a>(events: &'a [EventRecord], kind: Option<&str>) -> Vec<&'a EventRecord> {
    events
        .iter()
        .filter(|e| kind.is_none_or(|k| e.kind == k))
        .collect()
}

pub fn series_to_csv(records: &[TimeseriesRecord]) -> String {
    let mut out = String::from("time_s,temperature_c\n");
    for r in records {
        let _ = writeln!(out, "{},{}", r.time_s, r.temperature_c);
    }
    out
}

pub fn write_series_csv(path: &Path, records: &[TimeseriesRecord]) -> AppResult<()> {
    std::fs::write(path, series_to_csv(records)).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(time_s: f64, temperature_c: f64) -> TimeseriesRecord {
        TimeseriesRecord {
            time_s,
            temperature_c,
        }
    }

    fn ramp() -> Vec<TimeseriesRecord> {
        vec![rec(0.0, 20.0), rec(10.0, 30.0), rec(20.0, 25.0), rec(30.0, 45.0)]
    }

    #[test]
    fn summary_reports_extremes() {
        let s = get_run_summary(&ramp()).unwrap();
        assert_eq!(s.time_range, (0.0, 30.0));
        assert_eq!(s.record_count, 4);
        assert_eq!(s.min_temperature_c, 20.0);
        assert_eq!(s.max_temperature_c, 45.0);
        assert_eq!(s.final_temperature_c, 45.0);
    }

    #[test]
    fn empty_run_has_no_summary() {
        assert!(get_run_summary(&[]).is_err());
    }

    #[test]
    fn time_to_reach_interpolates_first_crossing() {
        let records = ramp();
        assert_eq!(time_to_reach(&records, 25.0), Some(5.0));
        assert_eq!(time_to_reach(&records, 35.0), Some(25.0));
        assert_eq!(time_to_reach(&records, 10.0), Some(0.0));
        assert_eq!(time_to_reach(&records, 50.0), None);
    }

    #[test]
    fn temperature_at_interpolates() {
        let records = ramp();
        assert_eq!(temperature_at(&records, 0.0).unwrap(), 20.0);
        assert_eq!(temperature_at(&records, 10.0).unwrap(), 30.0);
        assert_eq!(temperature_at(&records, 15.0).unwrap(), 27.5);
        assert!(temperature_at(&records, 31.0).is_err());
    }

    #[test]
    fn csv_has_header_and_rows() {
        let csv = series_to_csv(&[rec(0.0, 20.0), rec(1.5, 20.25)]);
        assert_eq!(csv, "time_s,temperature_c\n0,20\n1.5,20.25\n");
    }

    #[test]
    fn events_filtered_by_kind() {
        let events = vec![
            EventRecord {
                time_s: 0.0,
                kind: "ice_added".to_string(),
                message: "a".to_string(),
            },
            EventRecord {
                time_s: 9.0,
                kind: "melting_started".to_string(),
                message: "b".to_string(),
            },
        ];
        assert_eq!(filter_events(&events, None).len(), 2);
        let melting = filter_events(&events, Some("melting_started"));
        assert_eq!(melting.len(), 1);
        assert_eq!(melting[0].time_s, 9.0);
    }
}
