//! Calendar events

use super::filter::{Filter, ItemsQuery};
use super::types::{CalendarEvent, RawEvent, Venue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use tracing::{debug, warn};

/// Collection holding events
pub const COLLECTION: &str = "events";

const FIELDS: &[&str] = &[
    "id",
    "name",
    "date_start",
    "time_start",
    "date_end",
    "time_end",
    "status",
    "description",
    "venue.id",
    "venue.name",
    "venue_other",
    "image.id",
    "image.description",
    "url",
    "category",
];

/// Options of an events listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsQuery {
    /// Page size
    pub limit: u32,
    /// 1-based page number
    pub page: u32,
    /// Only events in this category
    pub category_id: Option<i64>,
    /// Only events starting in this month, as `YYYY-MM`
    pub month: Option<String>,
    /// Only events starting from now on
    pub upcoming: bool,
}

impl Default for EventsQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            page: 1,
            category_id: None,
            month: None,
            upcoming: false,
        }
    }
}

/// Row filter of an events listing
///
/// The month bound always uses day 31; the CMS compares dates as strings,
/// so shorter months still match correctly.
#[must_use]
pub fn events_filter(query: &EventsQuery, now: DateTime<Utc>) -> Filter {
    let month = query.month.as_deref().map(|month| {
        Filter::and([
            Filter::field("date_start").gte(format!("{month}-01")),
            Filter::field("date_start").lte(format!("{month}-31")),
        ])
    });
    let upcoming = query
        .upcoming
        .then(|| Filter::field("date_start").gte(now.to_rfc3339_opts(SecondsFormat::Millis, true)));

    Filter::all()
        .with(Filter::field("status").neq("draft"))
        .with_opt(query.category_id.map(|id| Filter::field("categories.id").eq(id)))
        .with_opt(month)
        .with_opt(upcoming)
}

/// Full query of an events listing
#[must_use]
pub fn list_query(query: &EventsQuery, now: DateTime<Utc>) -> ItemsQuery {
    ItemsQuery::select(FIELDS)
        .paginate(query.limit, query.page)
        .counted()
        .filter(events_filter(query, now))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    value
        .get(..10)
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
}

/// `HH:MM` or `HH:MM:SS`; seconds are ignored
fn parse_time(value: &str) -> Option<NaiveTime> {
    let mut parts = value.split(':');
    let hours = parts.next()?.trim().parse().ok()?;
    let minutes = parts.next()?.trim().parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Turn a stored event into a calendar entry
///
/// Returns `None` for events without a name or start date, and for events
/// whose dates or times cannot be parsed.
pub fn to_calendar_event(raw: RawEvent) -> Option<CalendarEvent> {
    let (Some(name), Some(start)) = (non_empty(raw.name), non_empty(raw.date_start)) else {
        debug!(event = ?raw.id, "Skipping event without name or start date");
        return None;
    };

    let Some(start_date) = parse_date(&start) else {
        warn!(event = ?raw.id, date_start = %start, "Skipping event with unparseable start date");
        return None;
    };

    let mut is_full_day = true;
    let mut date_start = start_date.and_time(NaiveTime::MIN);
    if let Some(time) = non_empty(raw.time_start) {
        let Some(start_time) = parse_time(&time) else {
            warn!(event = ?raw.id, time_start = %time, "Skipping event with unparseable start time");
            return None;
        };
        date_start = start_date.and_time(start_time);
        is_full_day = false;
    }

    let mut date_end: NaiveDateTime = match non_empty(raw.date_end) {
        Some(end) => match parse_date(&end) {
            Some(end_date) => end_date.and_time(NaiveTime::MIN),
            None => {
                warn!(event = ?raw.id, date_end = %end, "Skipping event with unparseable end date");
                return None;
            }
        },
        None => date_start,
    };

    let mut show_end_time = false;
    if !is_full_day {
        if let Some(time) = non_empty(raw.time_end) {
            let Some(end_time) = parse_time(&time) else {
                warn!(event = ?raw.id, time_end = %time, "Skipping event with unparseable end time");
                return None;
            };
            date_end = date_end.date().and_time(end_time);
            show_end_time = true;
        }
    }

    let venue = raw.venue.or_else(|| {
        non_empty(raw.venue_other).map(|name| Venue {
            id: None,
            name,
            address: None,
            url: None,
        })
    });

    Some(CalendarEvent {
        id: raw.id,
        name: Some(name),
        date_start,
        date_end: Some(date_end),
        is_full_day,
        show_end_time,
        status: raw.status,
        description: raw.description,
        venue,
        image: raw.image,
        url: raw.url,
        category: raw.category,
    })
}

/// Convert a page of stored events, dropping unusable ones
pub fn flatten_events(entries: Vec<Option<RawEvent>>) -> Vec<CalendarEvent> {
    entries.into_iter().flatten().filter_map(to_calendar_event).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn event(value: serde_json::Value) -> RawEvent {
        serde_json::from_value(value).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_full_day_event() {
        let calendar = to_calendar_event(event(json!({"name": "Camp", "date_start": "2024-05-01"}))).unwrap();

        assert!(calendar.is_full_day);
        assert!(!calendar.show_end_time);
        assert_eq!(calendar.date_start, at(2024, 5, 1, 0, 0));
        assert_eq!(calendar.date_end, Some(at(2024, 5, 1, 0, 0)));
    }

    #[test]
    fn test_timed_event_with_end_time() {
        let calendar = to_calendar_event(event(json!({
            "name": "Final",
            "date_start": "2024-05-01",
            "time_start": "14:00",
            "time_end": "16:00:00"
        })))
        .unwrap();

        assert!(!calendar.is_full_day);
        assert!(calendar.show_end_time);
        assert_eq!(calendar.date_start, at(2024, 5, 1, 14, 0));
        assert_eq!(calendar.date_end, Some(at(2024, 5, 1, 16, 0)));
    }

    #[test]
    fn test_end_time_ignored_for_full_day() {
        let calendar = to_calendar_event(event(json!({
            "name": "Tournament",
            "date_start": "2024-05-01",
            "date_end": "2024-05-03",
            "time_end": "18:00"
        })))
        .unwrap();

        assert!(calendar.is_full_day);
        assert!(!calendar.show_end_time);
        assert_eq!(calendar.date_end, Some(at(2024, 5, 3, 0, 0)));
    }

    #[test]
    fn test_drops_incomplete_events() {
        assert!(to_calendar_event(event(json!({"date_start": "2024-05-01"}))).is_none());
        assert!(to_calendar_event(event(json!({"name": "", "date_start": "2024-05-01"}))).is_none());
        assert!(to_calendar_event(event(json!({"name": "No date"}))).is_none());
        assert!(to_calendar_event(event(json!({"name": "Bad", "date_start": "May 1st"}))).is_none());
    }

    #[test]
    fn test_venue_fallback_to_free_text() {
        let with_text = to_calendar_event(event(json!({
            "name": "Meetup", "date_start": "2024-05-01", "venue_other": "Club house"
        })))
        .unwrap();
        assert_eq!(with_text.venue.unwrap().name, "Club house");

        let with_record = to_calendar_event(event(json!({
            "name": "Meetup", "date_start": "2024-05-01",
            "venue": {"id": 2, "name": "Arena"}, "venue_other": "ignored"
        })))
        .unwrap();
        assert_eq!(with_record.venue.unwrap().name, "Arena");

        let without = to_calendar_event(event(json!({"name": "Meetup", "date_start": "2024-05-01"}))).unwrap();
        assert!(without.venue.is_none());
    }

    #[test]
    fn test_filter_month_and_upcoming() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 8, 30, 0).unwrap();
        let query = EventsQuery {
            month: Some("2024-06".to_string()),
            upcoming: true,
            ..EventsQuery::default()
        };

        assert_eq!(
            events_filter(&query, now).to_json(),
            json!({"_and": [
                {"status": {"_neq": "draft"}},
                {"_and": [
                    {"date_start": {"_gte": "2024-06-01"}},
                    {"date_start": {"_lte": "2024-06-31"}},
                ]},
                {"date_start": {"_gte": "2024-05-10T08:30:00.000Z"}},
            ]})
        );
    }

    #[test]
    fn test_flatten_events_skips_nulls() {
        let events = flatten_events(vec![
            None,
            Some(event(json!({"name": "Camp", "date_start": "2024-05-01"}))),
        ]);
        assert_eq!(events.len(), 1);
    }
}
