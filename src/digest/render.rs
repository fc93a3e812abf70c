use std::fmt::Write;

use super::DayBuckets;
use crate::AppResult;
use crate::time_utils::{ReportWindow, short_date};

/// Render the Markdown digest.
///
/// Returns `Ok(None)` when there is nothing to report; callers are expected
/// to short-circuit on empty buckets before getting here.
#[tracing::instrument(level = "debug", skip_all, fields(days = buckets.len()))]
pub fn render(window: &ReportWindow, buckets: &DayBuckets) -> AppResult<Option<String>> {
    if buckets.is_empty() {
        return Ok(None);
    }

    let mut md = format!(
        "## Weekly Git Activity ({} – {})\n",
        short_date(window.start)?,
        short_date(window.end)?
    );
    for (day, entries) in buckets {
        write!(md, "\n### {day}\n")?;
        for entry in entries {
            writeln!(md, "- {entry}")?;
        }
    }
    Ok(Some(md))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::{CommitRecord, group};
    use time::Duration;
    use time::macros::datetime;

    fn window() -> ReportWindow {
        ReportWindow::ending_at(datetime!(2024-01-08 12:00 UTC), Duration::days(7))
    }

    #[test]
    fn renders_header_and_sorted_days() {
        let records = vec![
            CommitRecord::new("a", datetime!(2024-01-02 10:00 UTC), "fix bug"),
            CommitRecord::new("b", datetime!(2024-01-01 09:00 UTC), "add feature"),
            CommitRecord::new("a", datetime!(2024-01-02 11:00 UTC), "tidy\nbody"),
        ];
        let md = render(&window(), &group(&records)).unwrap().unwrap();
        assert_eq!(
            md,
            "## Weekly Git Activity (Jan 1 – Jan 8)\n\
             \n### 2024-01-01\n- [b] add feature\n\
             \n### 2024-01-02\n- [a] fix bug\n- [a] tidy\n"
        );
    }

    #[test]
    fn empty_buckets_render_nothing() {
        assert!(render(&window(), &DayBuckets::default()).unwrap().is_none());
    }
}
