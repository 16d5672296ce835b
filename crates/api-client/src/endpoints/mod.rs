//! Endpoint-specific API implementations
//!
//! | Module | Backend | Description |
//! |--------|---------|-------------|
//! | `cms` | Directus `/items/*` | News, events and team rosters, flattened to one locale |
//! | `tournament` | Leverade JSON:API | Tournaments, standings, matches and teams, cached by path |

pub mod cms;
pub mod tournament;

pub use cms::CmsApi;
pub use tournament::TournamentApi;
