//! CMS API endpoints
//!
//! Maps to the Directus `/items/<collection>` REST endpoints:
//! - `news`: paginated news listing and single news entries
//! - `events`: paginated calendar events
//! - `national_teams`: a team and its active roster

pub mod events;
pub mod filter;
pub mod news;
pub mod teams;
pub mod translation;
pub mod types;

pub use events::EventsQuery;
pub use filter::{Filter, ItemsQuery};
pub use news::NewsQuery;
pub use translation::{flatten_for_language, resolve_translation, Localized, Translatable};
pub use types::{CalendarEvent, Identifier, ListMeta, NewsEntry, Paginated, Player, Team};

use crate::client::{Backend, ClubhouseClient};
use crate::error::{ApiError, ApiResult};
use clubhouse_core::date::format_instant;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use types::{Envelope, RawEvent, RawNewsEntry, RawTeam};

/// CMS API interface
#[derive(Clone)]
pub struct CmsApi {
    client: ClubhouseClient,
}

impl CmsApi {
    /// Create a new CMS API interface
    pub(crate) fn new(client: ClubhouseClient) -> Self {
        Self { client }
    }

    async fn read<T: DeserializeOwned>(&self, path: &str, query: &ItemsQuery) -> ApiResult<Envelope<T>> {
        self.client.get_json(Backend::Cms, path, &query.to_params()).await
    }

    /// List published news in the current locale
    ///
    /// GET /items/news
    #[instrument(skip(self))]
    pub async fn get_news(&self, query: &NewsQuery) -> ApiResult<Paginated<NewsEntry>> {
        let locales = self.client.locales();
        let items = news::list_query(query, &locales.current_locale());

        let envelope: Envelope<Vec<Option<RawNewsEntry>>> =
            self.read(&format!("items/{}", news::COLLECTION), &items).await?;
        let total = envelope.meta.and_then(|m| m.filter_count).unwrap_or(0);
        let raw = envelope.data.ok_or_else(|| ApiError::missing_data("news"))?;

        let data = news::flatten_news_list(raw, &locales.candidates());
        let filtered_category_name = query
            .category_id
            .and_then(|id| news::filtered_category_name(&data, id));

        debug!(returned = data.len(), total, "Fetched news");

        Ok(Paginated {
            data,
            meta: ListMeta {
                total,
                filtered_category_name,
            },
        })
    }

    /// Fetch one news entry in the current locale, or the default one
    ///
    /// GET /items/news/{id}
    #[instrument(skip(self, id))]
    pub async fn get_one_news(&self, id: impl Into<Identifier>) -> ApiResult<NewsEntry> {
        let id = id.into();
        let locales = self.client.locales();
        let items = news::detail_query(&locales.current_locale());

        let envelope: Envelope<RawNewsEntry> = self
            .read(&format!("items/{}/{id}", news::COLLECTION), &items)
            .await?;
        let mut raw = envelope.data.ok_or_else(|| ApiError::missing_data("news"))?;
        if raw.id.is_none() {
            raw.id = Some(id);
        }

        news::flatten_one_news(raw, &locales.candidates())
    }

    /// List non-draft events
    ///
    /// GET /items/events
    #[instrument(skip(self))]
    pub async fn get_events(&self, query: &EventsQuery) -> ApiResult<Paginated<CalendarEvent>> {
        let items = events::list_query(query, self.client.clock().now());

        let envelope: Envelope<Vec<Option<RawEvent>>> =
            self.read(&format!("items/{}", events::COLLECTION), &items).await?;
        let total = envelope.meta.and_then(|m| m.filter_count).unwrap_or(0);
        let raw = envelope.data.ok_or_else(|| ApiError::missing_data("events"))?;

        let data = events::flatten_events(raw);
        debug!(returned = data.len(), total, "Fetched events");

        Ok(Paginated {
            data,
            meta: ListMeta {
                total,
                filtered_category_name: None,
            },
        })
    }

    /// Fetch a team by base or translated slug, with its active players
    ///
    /// GET /items/national_teams
    #[instrument(skip(self))]
    pub async fn get_team(&self, slug: &str) -> ApiResult<Team> {
        let current = self.client.locales().current_locale();
        let items = teams::team_query(slug, &current);

        let envelope: Envelope<Vec<Option<RawTeam>>> =
            self.read(&format!("items/{}", teams::COLLECTION), &items).await?;
        let raw = envelope
            .data
            .ok_or_else(|| ApiError::missing_data("team"))?
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| ApiError::not_found("team", slug))?;

        let today = format_instant(&self.client.clock().now(), "yyyy-MM-dd");
        Ok(teams::normalize_team(raw, &current, &today))
    }
}
