//! Team rosters

use super::filter::{deep, Filter, ItemsQuery};
use super::translation::Localized;
use super::types::{Player, RawPlayer, RawTeam, Team, TeamTranslation};
use std::cmp::Ordering;

/// Collection holding teams
pub const COLLECTION: &str = "national_teams";

const FIELDS: &[&str] = &[
    "name",
    "slug",
    "gender",
    "translations.languages_code",
    "translations.name",
    "translations.slug",
    "players.id",
    "players.first_name",
    "players.last_name",
    "players.number",
    "players.is_captain",
    "players.birth_year",
    "players.gender",
    "players.club.name",
    "players.positions.player_positions_id",
    "players.date_start",
    "players.date_end",
    "players.track_record",
    "players.portrait_square_head",
];

const NAME_FALLBACK: &str = "No name";
const SLUG_FALLBACK: &str = "unknown";
const GENDER_FALLBACK: &str = "mixed";

impl Localized for TeamTranslation {
    fn language_code(&self) -> Option<&str> {
        self.languages_code.as_deref()
    }
}

/// Query for the team whose base or translated slug is `slug`
#[must_use]
pub fn team_query(slug: &str, locale: &str) -> ItemsQuery {
    let filter = Filter::or([
        Filter::field("slug").eq(slug),
        Filter::field("translations.slug").eq(slug),
    ]);

    let mut query = ItemsQuery::select(FIELDS)
        .filter(filter)
        .deep(deep("translations", &Filter::field("languages_code").eq(locale)));
    query.limit = Some(1);
    query
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Build the served team from its stored record
///
/// `today` is the current date as `yyyy-MM-dd`; players whose `date_end`
/// lies before it have left the team and are removed.
#[must_use]
pub fn normalize_team(raw: RawTeam, current_locale: &str, today: &str) -> Team {
    let translation = raw.translations.as_deref().and_then(|translations| {
        translations
            .iter()
            .find(|t| t.language_code().is_none_or(|code| code == current_locale))
    });

    let name = translation
        .and_then(|t| non_empty(t.name.clone()))
        .or_else(|| non_empty(raw.name.clone()))
        .unwrap_or_else(|| NAME_FALLBACK.to_string());
    let slug = translation
        .and_then(|t| non_empty(t.slug.clone()))
        .or_else(|| non_empty(raw.slug.clone()))
        .unwrap_or_else(|| SLUG_FALLBACK.to_string());
    let gender = non_empty(raw.gender).unwrap_or_else(|| GENDER_FALLBACK.to_string());

    let mut players: Vec<Player> = raw
        .players
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(Player::from)
        .filter(|player| player.date_end.as_deref().is_none_or(|end| end >= today))
        .collect();
    sort_players(&mut players);

    Team {
        name,
        slug,
        gender,
        players,
    }
}

impl From<RawPlayer> for Player {
    fn from(raw: RawPlayer) -> Self {
        Self {
            id: raw.id,
            first_name: raw.first_name,
            last_name: raw.last_name,
            number: raw.number,
            is_captain: raw.is_captain.unwrap_or(false),
            birth_year: raw.birth_year,
            gender: raw.gender,
            club: raw.club,
            positions: raw
                .positions
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .filter_map(|link| link.player_positions_id)
                .collect(),
            date_start: raw.date_start,
            date_end: raw.date_end,
            track_record: raw.track_record,
            portrait_square_head: raw.portrait_square_head,
        }
    }
}

/// Captains first, then by last name, then by first name
pub fn sort_players(players: &mut [Player]) {
    players.sort_by(|a, b| {
        b.is_captain
            .cmp(&a.is_captain)
            .then_with(|| locale_compare(a.last_name.as_deref().unwrap_or(""), b.last_name.as_deref().unwrap_or("")))
            .then_with(|| locale_compare(a.first_name.as_deref().unwrap_or(""), b.first_name.as_deref().unwrap_or("")))
    });
}

/// Compare names ignoring case and Latin diacritics, then exactly
#[must_use]
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b)).then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).map(fold_accent).collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => 'i',
        'ł' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ř' => 'r',
        'ś' | 'š' | 'ş' => 's',
        'ť' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::cms::types::Identifier;
    use proptest::prelude::*;
    use serde_json::json;

    fn team(value: serde_json::Value) -> RawTeam {
        serde_json::from_value(value).unwrap()
    }

    fn names(team: &Team) -> Vec<String> {
        team.players
            .iter()
            .map(|p| p.last_name.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_query_shape() {
        let params = team_query("u21-men", "de").to_params();
        let get = |key: &str| params.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone());

        assert_eq!(get("limit").as_deref(), Some("1"));
        assert_eq!(
            get("filter").as_deref(),
            Some(r#"{"_or":[{"slug":{"_eq":"u21-men"}},{"translations":{"slug":{"_eq":"u21-men"}}}]}"#)
        );
        assert_eq!(
            get("deep").as_deref(),
            Some(r#"{"translations":{"_filter":{"languages_code":{"_eq":"de"}}}}"#)
        );
    }

    #[test]
    fn test_captain_first() {
        let team = normalize_team(
            team(json!({"players": [
                {"last_name": "Alpha", "first_name": "A", "is_captain": false},
                {"last_name": "Zeta", "first_name": "Z", "is_captain": true}
            ]})),
            "en",
            "2024-05-01",
        );
        assert_eq!(names(&team), vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_sort_by_last_then_first_name() {
        let team = normalize_team(
            team(json!({"players": [
                {"last_name": "Muller", "first_name": "Zoe"},
                {"last_name": "Müller", "first_name": "Anna"},
                {"last_name": "brand", "first_name": "Lea"},
                null
            ]})),
            "en",
            "2024-05-01",
        );
        let firsts: Vec<_> = team.players.iter().map(|p| p.first_name.clone().unwrap_or_default()).collect();
        assert_eq!(firsts, vec!["Lea", "Zoe", "Anna"]);
    }

    #[test]
    fn test_former_players_removed() {
        let team = normalize_team(
            team(json!({"players": [
                {"last_name": "Gone", "date_end": "2023-12-31"},
                {"last_name": "Today", "date_end": "2024-05-01"},
                {"last_name": "Open"}
            ]})),
            "en",
            "2024-05-01",
        );
        assert_eq!(names(&team), vec!["Open", "Today"]);
    }

    #[test]
    fn test_positions_unwrapped() {
        let team = normalize_team(
            team(json!({"players": [
                {"last_name": "P", "positions": [{"player_positions_id": 2}, null, {"player_positions_id": null}]}
            ]})),
            "en",
            "2024-05-01",
        );
        assert_eq!(team.players[0].positions, vec![Identifier::Number(2)]);
    }

    #[test]
    fn test_translation_overrides_base() {
        let team = normalize_team(
            team(json!({
                "name": "Men U21",
                "slug": "men-u21",
                "translations": [{"languages_code": "fr", "name": "Hommes U21", "slug": ""}]
            })),
            "fr",
            "2024-05-01",
        );
        assert_eq!(team.name, "Hommes U21");
        assert_eq!(team.slug, "men-u21");
        assert_eq!(team.gender, "mixed");
    }

    #[test]
    fn test_fallback_values() {
        let team = normalize_team(
            team(json!({"name": "", "translations": [{"languages_code": "de", "name": "Herren"}]})),
            "fr",
            "2024-05-01",
        );
        assert_eq!(team.name, "No name");
        assert_eq!(team.slug, "unknown");
        assert!(team.players.is_empty());
    }

    #[test]
    fn test_locale_compare() {
        assert_eq!(locale_compare("élan", "Elan"), Ordering::Greater);
        assert_eq!(locale_compare("Émile", "Fabian"), Ordering::Less);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    proptest! {
        #[test]
        fn locale_compare_is_antisymmetric(a in "\\PC{0,8}", b in "\\PC{0,8}") {
            prop_assert_eq!(locale_compare(&a, &b), locale_compare(&b, &a).reverse());
        }
    }
}
