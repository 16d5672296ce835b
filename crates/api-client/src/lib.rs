//! Typed adapters for the Clubhouse content backends
//!
//! This crate talks to the two services the club website is built on:
//!
//! - **CMS** (Directus REST): news, calendar events and team rosters, each
//!   stored with per-locale translation records and flattened here into a
//!   single locale with a current-then-default fallback
//! - **Tournament provider** (Leverade JSON:API): tournaments, standings,
//!   matches and teams, served through a path-keyed response cache owned by
//!   the adapter
//!
//! # Example
//!
//! ```rust,no_run
//! use clubhouse_api_client::{ClientConfig, ClubhouseClient};
//! use clubhouse_api_client::endpoints::cms::NewsQuery;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClubhouseClient::with_config(ClientConfig::from_env()?)?.with_locale("fr");
//!
//!     let news = client.cms().get_news(&NewsQuery::default()).await?;
//!     println!("{} of {} news entries", news.data.len(), news.meta.total);
//!
//!     let game = client.tournament().get_match(4711).await?;
//!     println!("Match {} starts at {:?}", game.data.id, game.data.attributes.datetime);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::{Backend, ClubhouseClient, RawResponse};
pub use config::{ClientConfig, Environment};
pub use error::{ApiError, ApiResult, TranslationError};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::{Backend, ClubhouseClient};
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::endpoints::cms::{CmsApi, EventsQuery, NewsQuery, Paginated};
    pub use crate::endpoints::tournament::{CachedResponse, RequestOptions, TournamentApi};
    pub use crate::error::{ApiError, ApiResult, TranslationError};
}
