use std::collections::BTreeMap;
use std::collections::btree_map;

use time::Date;

use super::CommitRecord;
use crate::time_utils::day_key;

/// Commit entries keyed by UTC calendar day, iterated oldest day first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayBuckets {
    days: BTreeMap<Date, Vec<String>>,
}

impl DayBuckets {
    pub fn push(&mut self, record: &CommitRecord) {
        self.days
            .entry(day_key(record.timestamp))
            .or_default()
            .push(record.entry());
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of distinct days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Total number of entries across all days.
    pub fn entry_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn get(&self, day: &Date) -> Option<&[String]> {
        self.days.get(day).map(Vec::as_slice)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Date, Vec<String>> {
        self.days.iter()
    }
}

impl<'a> IntoIterator for &'a DayBuckets {
    type Item = (&'a Date, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, Date, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Bucket records by day, keeping arrival order inside each day.
#[tracing::instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn group(records: &[CommitRecord]) -> DayBuckets {
    let mut buckets = DayBuckets::default();
    for record in records {
        buckets.push(record);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use time::macros::{date, datetime};
    use time::{Duration, OffsetDateTime};

    #[test]
    fn days_come_out_ascending() {
        let records = vec![
            CommitRecord::new("a", datetime!(2024-01-02 10:00 UTC), "fix bug"),
            CommitRecord::new("b", datetime!(2024-01-01 09:00 UTC), "add feature"),
        ];
        let buckets = group(&records);
        let keys: Vec<String> = buckets.iter().map(|(d, _)| d.to_string()).collect();
        assert_eq!(keys, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(buckets.get(&date!(2024-01-01)), Some(&["[b] add feature".to_string()][..]));
        assert_eq!(buckets.get(&date!(2024-01-02)), Some(&["[a] fix bug".to_string()][..]));
    }

    #[test]
    fn same_day_keeps_arrival_order() {
        let records = vec![
            CommitRecord::new("web", datetime!(2024-03-05 18:00 UTC), "third"),
            CommitRecord::new("api", datetime!(2024-03-05 08:00 UTC), "first"),
            CommitRecord::new("web", datetime!(2024-03-05 12:00 UTC), "second"),
        ];
        let buckets = group(&records);
        assert_eq!(buckets.len(), 1);
        assert_eq!(
            buckets.get(&date!(2024-03-05)).unwrap(),
            ["[web] third", "[api] first", "[web] second"]
        );
    }

    #[test]
    fn no_records_no_days() {
        let buckets = group(&[]);
        assert!(buckets.is_empty());
        assert_eq!(buckets.entry_count(), 0);
    }

    fn record() -> impl Strategy<Value = CommitRecord> {
        ("[a-c]", 0i64..(14 * 24), "[a-z ]{0,12}").prop_map(|(repo, hours, msg)| {
            let ts = OffsetDateTime::UNIX_EPOCH + Duration::days(19_723) + Duration::hours(hours);
            CommitRecord::new(repo, ts, &msg)
        })
    }

    proptest! {
        #[test]
        fn grouping_neither_drops_nor_duplicates(records in prop::collection::vec(record(), 0..60)) {
            let buckets = group(&records);
            prop_assert_eq!(buckets.entry_count(), records.len());
        }

        #[test]
        fn grouping_keeps_order_and_sorts_days(records in prop::collection::vec(record(), 0..60)) {
            let buckets = group(&records);
            let days: Vec<Date> = buckets.iter().map(|(d, _)| *d).collect();
            let mut sorted = days.clone();
            sorted.sort();
            prop_assert_eq!(&days, &sorted);

            for (day, entries) in &buckets {
                let expected: Vec<String> = records
                    .iter()
                    .filter(|r| day_key(r.timestamp) == *day)
                    .map(CommitRecord::entry)
                    .collect();
                prop_assert_eq!(entries, &expected);
            }
        }
    }
}
