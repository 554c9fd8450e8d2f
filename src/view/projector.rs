//! Sorted view projector
//!
//! Turns a store snapshot into a feed ordered newest first.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheEntry;

/// Local wall-clock time with millisecond precision, e.g. `2024-03-01T09:05:07.042`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

// == Window ==
/// Which slice of the descending feed to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    /// The whole feed
    #[default]
    All,
    /// The last `n` items of the descending feed, i.e. the `n` oldest live
    /// entries. Kept for compatibility with existing consumers of the view.
    Last(usize),
    /// The first `n` items of the descending feed, i.e. the `n` newest.
    Latest(usize),
}

// == View Item ==
/// Read-only projection of one entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub luw_id: Option<Value>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_date: Option<Value>,
    /// Admission time, formatted with [`TIMESTAMP_FORMAT`]
    pub timestamp: String,
    pub key: String,
}

impl ViewItem {
    pub fn from_entry(entry: &CacheEntry) -> Self {
        let record = &entry.record;
        Self {
            luw_id: record.luw_id().cloned(),
            record_type: record.record_type().cloned(),
            subject: record.subject().cloned(),
            business_date: record.business_date().cloned(),
            timestamp: format_timestamp(entry.inserted_at),
            key: entry.key.clone(),
        }
    }
}

/// Formats an instant in the process's local timezone.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}

// == Project ==
/// Sorts entries by admission time, newest first, and applies `window`.
///
/// The sort is stable, so entries admitted at the same instant keep their
/// snapshot order.
pub fn project(mut entries: Vec<CacheEntry>, window: Window) -> Vec<ViewItem> {
    entries.sort_by(|a, b| b.inserted_at.cmp(&a.inserted_at));

    let len = entries.len();
    let selected = match window {
        Window::All => &entries[..],
        Window::Last(n) => &entries[len.saturating_sub(n)..],
        Window::Latest(n) => &entries[..n.min(len)],
    };

    selected.iter().map(ViewItem::from_entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use serde_json::json;

    fn entries(count: i64) -> Vec<CacheEntry> {
        let t0 = Utc::now();
        // shuffled admission order
        (1..=count)
            .rev()
            .map(|n| {
                let record: Record =
                    serde_json::from_value(json!({ "luwId": n, "type": "t", "subject": "s" }))
                        .unwrap();
                CacheEntry::with_inserted_at(n.to_string(), record, t0 + ChronoDuration::seconds(n))
            })
            .collect()
    }

    fn keys(items: &[ViewItem]) -> Vec<&str> {
        items.iter().map(|i| i.key.as_str()).collect()
    }

    #[test]
    fn test_project_all_descending() {
        let mut input = entries(5);
        input.swap(0, 3);
        let items = project(input, Window::All);
        assert_eq!(keys(&items), vec!["5", "4", "3", "2", "1"]);
    }

    #[test]
    fn test_last_window_takes_tail() {
        let items = project(entries(5), Window::Last(2));
        assert_eq!(keys(&items), vec!["2", "1"]);
    }

    #[test]
    fn test_latest_window_takes_head() {
        let items = project(entries(5), Window::Latest(2));
        assert_eq!(keys(&items), vec!["5", "4"]);
    }

    #[test]
    fn test_window_larger_than_feed() {
        assert_eq!(project(entries(3), Window::Last(10)).len(), 3);
        assert_eq!(project(entries(3), Window::Latest(10)).len(), 3);
        assert!(project(entries(3), Window::Last(0)).is_empty());
        assert!(project(Vec::new(), Window::Last(4)).is_empty());
    }

    #[test]
    fn test_equal_timestamps_keep_snapshot_order() {
        let at = Utc::now();
        let input = vec![
            CacheEntry::with_inserted_at("b", Record::default(), at),
            CacheEntry::with_inserted_at("a", Record::default(), at),
        ];
        assert_eq!(keys(&project(input, Window::All)), vec!["b", "a"]);
    }

    #[test]
    fn test_view_item_fields() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap() + ChronoDuration::milliseconds(42);
        let record: Record = serde_json::from_value(json!({
            "luwId": "L1",
            "type": "trade",
            "subject": "AAPL",
            "businessDate": "2024-03-01",
            "ignored": true
        }))
        .unwrap();
        let item = ViewItem::from_entry(&CacheEntry::with_inserted_at("12", record, at));

        let expected_ts = at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string();
        assert_eq!(item.timestamp, expected_ts);
        assert!(item.timestamp.ends_with(":07.042"));

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            json!({
                "luwId": "L1",
                "type": "trade",
                "subject": "AAPL",
                "businessDate": "2024-03-01",
                "timestamp": expected_ts,
                "key": "12"
            })
        );
    }

    #[test]
    fn test_missing_fields_omitted() {
        let item = ViewItem::from_entry(&CacheEntry::new("3", Record::default()));
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("luwId").is_none());
        assert!(json.get("type").is_none());
        assert_eq!(json["key"], "3");
    }
}
