//! CMS record shapes, raw (as stored) and flattened (as served)

#![allow(missing_docs)]

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A record identifier, numeric or textual depending on the collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Integer key
    Number(i64),
    /// String key (UUIDs, slugs)
    Text(String),
}

impl Identifier {
    /// Whether this is the numeric id `id`, in either representation
    #[must_use]
    pub fn matches_number(&self, id: i64) -> bool {
        match self {
            Self::Number(n) => *n == id,
            Self::Text(s) => s.parse::<i64>().is_ok_and(|n| n == id),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// Reference to an uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Page of results with the total number of matching records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: ListMeta,
}

/// Metadata of a [`Paginated`] list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMeta {
    /// Records matching the filter, across all pages
    pub total: u64,
    /// Localized name of the category the list was filtered by
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_category_name: Option<String>,
}

/// Response envelope of the `/items` endpoints
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
    pub meta: Option<EnvelopeMeta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct EnvelopeMeta {
    #[serde(default)]
    pub filter_count: Option<u64>,
}

/// Read a list that may contain `null` rows, keeping only the real ones
fn without_nulls<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let rows: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(rows.map(|rows| rows.into_iter().flatten().collect()))
}

// ---------------------------------------------------------------------------
// News
// ---------------------------------------------------------------------------

/// News entry as stored, with all its translations
#[derive(Debug, Clone, Deserialize)]
pub struct RawNewsEntry {
    pub id: Option<Identifier>,
    pub date_created: Option<String>,
    pub date_updated: Option<String>,
    pub main_image: Option<Image>,
    #[serde(default, deserialize_with = "without_nulls")]
    pub translations: Option<Vec<NewsTranslation>>,
    pub categories: Option<Vec<Option<RawCategoryLink>>>,
}

/// One locale of a news entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsTranslation {
    pub languages_code: Option<String>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Junction row linking a news entry to a category
#[derive(Debug, Clone, Deserialize)]
pub struct RawCategoryLink {
    pub id: Option<Identifier>,
    pub news_categories_id: Option<RawNewsCategory>,
}

/// Category as stored
#[derive(Debug, Clone, Deserialize)]
pub struct RawNewsCategory {
    #[serde(default, deserialize_with = "without_nulls")]
    pub translations: Option<Vec<CategoryTranslation>>,
}

/// One locale of a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTranslation {
    pub languages_code: Option<String>,
    pub slug: Option<String>,
    pub name: Option<String>,
}

/// News entry flattened to a single locale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsEntry {
    pub id: Option<Identifier>,
    pub date_created: Option<String>,
    pub date_updated: Option<String>,
    pub main_image: Option<Image>,
    /// Locale the text fields are in
    pub languages_code: String,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub categories: Vec<NewsCategory>,
}

/// Category of a flattened news entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsCategory {
    pub id: Option<Identifier>,
    pub slug: Option<String>,
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Event as stored, with date and time in separate columns
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub id: Option<Identifier>,
    pub name: Option<String>,
    pub date_start: Option<String>,
    pub time_start: Option<String>,
    pub date_end: Option<String>,
    pub time_end: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub venue: Option<Venue>,
    pub venue_other: Option<String>,
    pub image: Option<Image>,
    pub url: Option<String>,
    pub category: Option<Identifier>,
}

/// Place an event happens at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default)]
    pub id: Option<Identifier>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Event ready for a calendar view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Option<Identifier>,
    pub name: Option<String>,
    pub date_start: NaiveDateTime,
    pub date_end: Option<NaiveDateTime>,
    /// No start time was given
    #[serde(rename = "isFullDay")]
    pub is_full_day: bool,
    /// An end time was given
    #[serde(rename = "showEndTime")]
    pub show_end_time: bool,
    pub status: Option<String>,
    pub description: Option<String>,
    /// The venue record, or a name-only venue built from the free-text field
    pub venue: Option<Venue>,
    pub image: Option<Image>,
    pub url: Option<String>,
    pub category: Option<Identifier>,
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// Team as stored
#[derive(Debug, Clone, Deserialize)]
pub struct RawTeam {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "without_nulls")]
    pub translations: Option<Vec<TeamTranslation>>,
    pub players: Option<Vec<Option<RawPlayer>>>,
}

/// One locale of a team's name and slug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamTranslation {
    pub languages_code: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// Player as stored
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayer {
    pub id: Option<Identifier>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub number: Option<u32>,
    pub is_captain: Option<bool>,
    pub birth_year: Option<i32>,
    pub gender: Option<String>,
    pub club: Option<Club>,
    pub positions: Option<Vec<Option<PositionLink>>>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub track_record: Option<String>,
    pub portrait_square_head: Option<String>,
}

/// Club a player is registered with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    #[serde(default)]
    pub name: Option<String>,
}

/// Junction row linking a player to a position
#[derive(Debug, Clone, Deserialize)]
pub struct PositionLink {
    pub player_positions_id: Option<Identifier>,
}

/// Team with its current roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub slug: String,
    pub gender: String,
    pub players: Vec<Player>,
}

/// Active roster member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: Option<Identifier>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub number: Option<u32>,
    pub is_captain: bool,
    pub birth_year: Option<i32>,
    pub gender: Option<String>,
    pub club: Option<Club>,
    /// Position identifiers, unwrapped from their junction rows
    pub positions: Vec<Identifier>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub track_record: Option<String>,
    pub portrait_square_head: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_untagged() {
        let ids: Vec<Identifier> = serde_json::from_value(json!([3, "a1b2"])).unwrap();
        assert_eq!(ids, vec![Identifier::Number(3), Identifier::Text("a1b2".to_string())]);
        assert_eq!(ids[0].to_string(), "3");
    }

    #[test]
    fn test_identifier_matches_number() {
        assert!(Identifier::Number(5).matches_number(5));
        assert!(Identifier::Text("5".to_string()).matches_number(5));
        assert!(!Identifier::Text("five".to_string()).matches_number(5));
    }

    #[test]
    fn test_envelope_without_data() {
        let envelope: Envelope<Vec<RawNewsEntry>> = serde_json::from_value(json!({"errors": []})).unwrap();
        assert!(envelope.data.is_none());
        assert!(envelope.meta.is_none());
    }

    fn parse_envelope<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Envelope<T> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_envelope_for_any_payload() {
        let envelope: Envelope<RawNewsEntry> = parse_envelope(json!({"data": {"id": 1}}));
        assert_eq!(envelope.data.and_then(|d| d.id), Some(Identifier::Number(1)));
    }

    #[test]
    fn test_null_translation_rows_are_skipped() {
        let entry: RawNewsEntry = serde_json::from_value(json!({
            "id": 2,
            "translations": [null, {"languages_code": "en", "title": "Hello"}],
            "categories": [{"id": 1, "news_categories_id": {"translations": [null]}}]
        }))
        .unwrap();

        let translations = entry.translations.unwrap_or_default();
        assert_eq!(translations.len(), 1);
        assert_eq!(translations[0].title.as_deref(), Some("Hello"));

        let team: RawTeam = serde_json::from_value(json!({"translations": [null], "players": null})).unwrap();
        assert_eq!(team.translations, Some(Vec::new()));
    }

    #[test]
    fn test_missing_translations_stay_absent() {
        let entry: RawNewsEntry = serde_json::from_value(json!({"id": 3})).unwrap();
        assert!(entry.translations.is_none());
    }

    #[test]
    fn test_calendar_event_wire_names() {
        let event = CalendarEvent {
            id: Some(Identifier::Number(1)),
            name: None,
            date_start: chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            date_end: None,
            is_full_day: true,
            show_end_time: false,
            status: None,
            description: None,
            venue: None,
            image: None,
            url: None,
            category: None,
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["isFullDay"], true);
        assert_eq!(value["showEndTime"], false);
    }

    #[test]
    fn test_list_meta_skips_missing_category_name() {
        let value = serde_json::to_value(ListMeta { total: 4, filtered_category_name: None }).unwrap();
        assert_eq!(value, json!({"total": 4}));
    }
}
