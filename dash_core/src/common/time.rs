use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::common::dash_exception::{DashError, DashResult, ErrCode};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";
const COMPACT_DATE_FMT: &str = "%Y%m%d";

/// Parse a timestamp cell.
///
/// Supports "YYYY-MM-DD HH:MM:SS", "YYYY-MM-DD" and "YYYYMMDD". Date-only
/// inputs resolve to midnight.
pub fn parse_datetime(time_str: &str) -> DashResult<NaiveDateTime> {
    let s = time_str.trim();
    if s.contains('-') {
        if s.contains(':') {
            return NaiveDateTime::parse_from_str(s, DATETIME_FMT).map_err(|e| bad_time(s, e));
        }
        let date = NaiveDate::parse_from_str(s, DATE_FMT).map_err(|e| bad_time(s, e))?;
        Ok(date.and_time(NaiveTime::MIN))
    } else {
        let date = NaiveDate::parse_from_str(s, COMPACT_DATE_FMT).map_err(|e| bad_time(s, e))?;
        Ok(date.and_time(NaiveTime::MIN))
    }
}

pub fn to_str(datetime: &NaiveDateTime) -> String {
    if datetime.time() == NaiveTime::MIN {
        datetime.format(DATE_FMT).to_string()
    } else {
        datetime.format(DATETIME_FMT).to_string()
    }
}

pub fn to_date_str(datetime: &NaiveDateTime) -> String {
    datetime.format(COMPACT_DATE_FMT).to_string()
}

fn bad_time(s: &str, err: chrono::ParseError) -> DashError {
    DashError::new(
        format!("invalid timestamp {:?}: {}", s, err),
        ErrCode::SrcDataFormatError,
    )
}
