//! Tournament API endpoints
//!
//! Maps to the public, unauthenticated part of the Leverade JSON:API:
//! - `/tournaments/{id}` with groups, rounds, matches and teams included
//! - `/groups/{id}/standings`
//! - `/matches` filtered by season or id
//! - `/teams` filtered by tournament
//!
//! Every response is cached by its request path for the lifetime of the
//! adapter. Entries never expire; pass [`RequestOptions::fresh`] to refetch.

pub mod types;

pub use types::{Document, Included, Match, Resource, Team, Tournament};

use crate::client::{Backend, ClubhouseClient};
use crate::error::{ApiError, ApiResult};
use chrono::{DateTime, Utc};
use clubhouse_core::cache::{CacheStats, ResponseCache};
use clubhouse_core::date::format_instant;
use clubhouse_telemetry::{metrics, names};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Request paths, relative to the tournament base URL
pub mod paths {
    use std::fmt::Display;

    /// A tournament with its whole bracket
    pub fn full_tournament(id: impl Display) -> String {
        format!(
            "/tournaments/{id}?include=groups,groups.rounds,groups.rounds.faceoffs,groups.rounds.matches,groups.rounds.matches.facility,groups.rounds.matches.results,teams"
        )
    }

    /// Standings table of a group
    pub fn standings(group_id: impl Display) -> String {
        format!("/groups/{group_id}/standings")
    }

    /// Matches of a season after `today` (`yyyy-MM-dd`), soonest first
    pub fn upcoming_matches(season_id: impl Display, today: &str) -> String {
        format!(
            "/matches?filter=datetime>{today},round.group.tournament.season.id:{season_id}&sort=datetime&include=round.group.tournament,teams,facility"
        )
    }

    /// A single match through the list endpoint, which needs no authentication
    pub fn single_match(id: impl Display) -> String {
        format!(
            "/matches?filter=id:{id}&include=round,round.group,round.group.tournament,faceoff,teams,results,periods,matchreferees.license.profile,periods.results,results,facility"
        )
    }

    /// Teams registered in a tournament
    pub fn teams(tournament_id: impl Display) -> String {
        format!("/teams?filter=registrable[tournament].id:{tournament_id}")
    }
}

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Skip the cache lookup and replace the cached entry
    pub invalidate_cache: bool,
    /// Extra headers. `Authorization` is always removed.
    pub headers: HeaderMap,
}

impl RequestOptions {
    /// Options that bypass and refresh the cache
    #[must_use]
    pub fn fresh() -> Self {
        Self {
            invalidate_cache: true,
            ..Self::default()
        }
    }

    /// Add a request header
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A stored tournament response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    /// Request path, also the cache key
    pub path: String,
    /// HTTP status code
    pub status: u16,
    /// Parsed JSON body
    pub body: Value,
    /// Correlation ID of the request that filled the entry
    pub request_id: String,
    /// When the response was received
    pub fetched_at: DateTime<Utc>,
}

impl CachedResponse {
    /// Deserialize the body into `T`
    pub fn decode<T: DeserializeOwned>(&self) -> ApiResult<T> {
        Ok(T::deserialize(&self.body)?)
    }

    /// The body, failing if its `data` member is absent or null
    pub fn require_data(&self) -> ApiResult<&Value> {
        if self.body.get("data").is_none_or(Value::is_null) {
            return Err(ApiError::missing_data(self.path.clone()));
        }
        Ok(&self.body)
    }

    /// Deserialize a JSON:API document, failing if `data` is absent
    pub fn document<T: DeserializeOwned>(&self) -> ApiResult<Document<T>> {
        Ok(Document::deserialize(self.require_data()?)?)
    }
}

/// Tournament API interface
#[derive(Clone)]
pub struct TournamentApi {
    client: ClubhouseClient,
    cache: Arc<ResponseCache<CachedResponse>>,
    options: RequestOptions,
}

impl TournamentApi {
    /// Create a new tournament API interface
    pub(crate) fn new(client: ClubhouseClient, cache: Arc<ResponseCache<CachedResponse>>) -> Self {
        Self {
            client,
            cache,
            options: RequestOptions::default(),
        }
    }

    /// Same adapter and cache, different request options for the typed operations
    #[must_use]
    pub fn with_options(&self, options: RequestOptions) -> Self {
        Self {
            options,
            ..self.clone()
        }
    }

    /// Same adapter and cache, refetching on every typed operation
    #[must_use]
    pub fn fresh(&self) -> Self {
        self.with_options(RequestOptions {
            invalidate_cache: true,
            ..self.options.clone()
        })
    }

    /// Cache statistics
    pub fn cache_stats(&self) -> ApiResult<CacheStats> {
        Ok(self.cache.stats()?)
    }

    /// Drop every cached response
    pub fn clear_cache(&self) -> ApiResult<()> {
        Ok(self.cache.clear()?)
    }

    /// Return the cached response for `path`, fetching it on a miss
    ///
    /// With `invalidate_cache` the lookup is skipped and the new response
    /// replaces the cached one. Failed requests are never cached.
    #[instrument(skip(self, options), fields(refresh = options.invalidate_cache))]
    pub async fn get_cached_query(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> ApiResult<Arc<CachedResponse>> {
        let client = &self.client;
        let headers = &options.headers;
        let mut fetched = false;

        let response = self
            .cache
            .get_or_fetch(path, options.invalidate_cache, || {
                fetched = true;
                async move {
                    let raw = client.fetch(Backend::Tournament, path, &[], headers).await?;
                    Ok::<_, ApiError>(CachedResponse {
                        path: path.to_string(),
                        status: raw.status,
                        body: raw.body,
                        request_id: raw.request_id,
                        fetched_at: client.clock().now(),
                    })
                }
            })
            .await?;

        if fetched {
            metrics().increment(names::CACHE_MISS);
            debug!(request_id = %response.request_id, "Stored tournament response");
        } else {
            metrics().increment(names::CACHE_HIT);
            debug!("Served tournament response from cache");
        }

        Ok(response)
    }

    /// A tournament with groups, rounds, faceoffs, matches, facilities,
    /// results and teams included
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn get_full_tournament(&self, id: impl Display) -> ApiResult<Document<Tournament>> {
        self.get_cached_query(&paths::full_tournament(&id), &self.options)
            .await?
            .document()
    }

    /// Standings of a group, untyped
    #[instrument(skip(self, group_id), fields(group_id = %group_id))]
    pub async fn get_standings(&self, group_id: impl Display) -> ApiResult<Value> {
        let response = self
            .get_cached_query(&paths::standings(&group_id), &self.options)
            .await?;
        Ok(response.require_data()?.clone())
    }

    /// Matches of a season from today on, soonest first
    #[instrument(skip(self, season_id), fields(season_id = %season_id))]
    pub async fn get_upcoming_matches(&self, season_id: impl Display) -> ApiResult<Document<Vec<Match>>> {
        let today = format_instant(&self.client.clock().now(), "yyyy-MM-dd");
        self.get_cached_query(&paths::upcoming_matches(&season_id, &today), &self.options)
            .await?
            .document()
    }

    /// A single match with its round, teams, results, periods, referees
    /// and facility
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn get_match(&self, id: impl Display) -> ApiResult<Document<Match>> {
        let list: Document<Vec<Match>> = self
            .get_cached_query(&paths::single_match(&id), &self.options)
            .await?
            .document()?;

        let Document { data, included, meta } = list;
        let game = data
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found("match", &id))?;

        Ok(Document {
            data: game,
            included,
            meta,
        })
    }

    /// Teams registered in a tournament
    #[instrument(skip(self, tournament_id), fields(tournament_id = %tournament_id))]
    pub async fn get_teams(&self, tournament_id: impl Display) -> ApiResult<Document<Vec<Team>>> {
        self.get_cached_query(&paths::teams(&tournament_id), &self.options)
            .await?
            .document()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paths() {
        assert_eq!(paths::standings(12), "/groups/12/standings");
        assert_eq!(paths::teams("77"), "/teams?filter=registrable[tournament].id:77");
        assert!(paths::full_tournament(5).starts_with("/tournaments/5?include=groups,"));
        assert!(paths::single_match(9).starts_with("/matches?filter=id:9&include=round,"));
        assert_eq!(
            paths::upcoming_matches("s-1", "2024-05-01"),
            "/matches?filter=datetime>2024-05-01,round.group.tournament.season.id:s-1&sort=datetime&include=round.group.tournament,teams,facility"
        );
    }

    #[test]
    fn test_fresh_options() {
        let options = RequestOptions::fresh();
        assert!(options.invalidate_cache);
        assert!(options.headers.is_empty());
        assert!(!RequestOptions::default().invalidate_cache);
    }

    #[test]
    fn test_document_requires_data() {
        let cached = CachedResponse {
            path: "/teams".to_string(),
            status: 200,
            body: json!({"errors": []}),
            request_id: "r".to_string(),
            fetched_at: Utc::now(),
        };

        let err = cached.document::<Vec<Team>>().unwrap_err();
        assert_eq!(err.to_string(), "Error when retrieving /teams");
    }

    #[test]
    fn test_require_data_rejects_null() {
        let cached = CachedResponse {
            path: "/groups/2/standings".to_string(),
            status: 200,
            body: json!({"data": null}),
            request_id: "r".to_string(),
            fetched_at: Utc::now(),
        };

        assert!(matches!(cached.require_data(), Err(ApiError::MissingData { .. })));
    }

    #[test]
    fn test_decode_untyped() {
        let cached = CachedResponse {
            path: "/groups/1/standings".to_string(),
            status: 200,
            body: json!({"data": [{"position": 1}]}),
            request_id: "r".to_string(),
            fetched_at: Utc::now(),
        };

        let value: Value = cached.decode().unwrap();
        assert_eq!(value["data"][0]["position"], 1);
    }
}
