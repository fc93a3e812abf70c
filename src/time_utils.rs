use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, time};
use time::{Date, Duration, OffsetDateTime, UtcOffset};
use tracing::trace;

use crate::AppResult;

/// `Jan 8`
const SHORT_DATE: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day padding:none]");

/// Second-precision UTC timestamp accepted by the GitHub `since`/`until` parameters.
const GITHUB_TIMESTAMP: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

/// The span of time a digest covers. All calendar math is done in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl ReportWindow {
    #[tracing::instrument(level = "trace")]
    pub fn ending_at(now: OffsetDateTime, lookback: Duration) -> Self {
        let end = now.to_offset(UtcOffset::UTC);
        let start = end.saturating_sub(lookback);
        trace!("Report window is {} to {}", start, end);
        Self { start, end }
    }

    /// Lower bound for commit queries.
    pub fn since(&self) -> OffsetDateTime {
        self.start
    }

    /// Upper bound for commit queries: the last instant of the window's final day.
    pub fn until(&self) -> OffsetDateTime {
        self.end.replace_time(time!(23:59:59.999))
    }
}

/// Calendar day a timestamp belongs to, in UTC.
pub fn day_key(ts: OffsetDateTime) -> Date {
    ts.to_offset(UtcOffset::UTC).date()
}

pub fn short_date(dt: OffsetDateTime) -> AppResult<String> {
    Ok(dt.to_offset(UtcOffset::UTC).format(SHORT_DATE)?)
}

pub fn github_timestamp(dt: OffsetDateTime) -> AppResult<String> {
    Ok(dt.to_offset(UtcOffset::UTC).format(GITHUB_TIMESTAMP)?)
}

/// Convert a humantime-parsed duration into a calendar duration.
pub fn to_time_duration(duration: std::time::Duration) -> AppResult<Duration> {
    Ok(Duration::try_from(duration)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn window_spans_lookback_and_closes_at_end_of_day() {
        let window = ReportWindow::ending_at(datetime!(2024-01-08 10:30 UTC), Duration::days(7));
        assert_eq!(window.since(), datetime!(2024-01-01 10:30 UTC));
        assert_eq!(window.until(), datetime!(2024-01-08 23:59:59.999 UTC));
    }

    #[test]
    fn window_is_normalized_to_utc() {
        let window = ReportWindow::ending_at(datetime!(2024-01-08 01:00 +3), Duration::days(7));
        assert_eq!(window.end, datetime!(2024-01-07 22:00 UTC));
        assert_eq!(window.end.offset(), UtcOffset::UTC);
    }

    #[test]
    fn day_key_uses_utc_calendar() {
        assert_eq!(day_key(datetime!(2024-01-02 01:00 +5)), date!(2024-01-01));
        assert_eq!(day_key(datetime!(2024-01-02 10:00 UTC)), date!(2024-01-02));
    }

    #[test]
    fn short_date_drops_day_padding() {
        assert_eq!(short_date(datetime!(2024-01-08 00:00 UTC)).unwrap(), "Jan 8");
        assert_eq!(short_date(datetime!(2024-12-25 00:00 UTC)).unwrap(), "Dec 25");
    }

    #[test]
    fn github_timestamp_is_second_precision_zulu() {
        let ts = datetime!(2024-01-08 23:59:59.999 +1);
        assert_eq!(github_timestamp(ts).unwrap(), "2024-01-08T22:59:59Z");
    }
}
