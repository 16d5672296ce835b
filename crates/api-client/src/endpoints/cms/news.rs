//! News listing and detail

use super::filter::{deep, Filter, ItemsQuery};
use super::translation::{resolve_translation, Localized, Translatable};
use super::types::{NewsCategory, NewsEntry, NewsTranslation, RawCategoryLink, RawNewsEntry};
use crate::error::{ApiError, ApiResult, TranslationError};
use clubhouse_core::locale::{LocaleCandidates, Resolution};
use clubhouse_telemetry::{metrics, names};
use tracing::{debug, warn};

/// Collection holding news entries
pub const COLLECTION: &str = "news";

const LIST_FIELDS: &[&str] = &[
    "id",
    "main_image.id",
    "main_image.description",
    "translations.languages_code",
    "translations.slug",
    "translations.title",
    "categories.id",
    "categories.news_categories_id.translations.slug",
    "categories.news_categories_id.translations.name",
];

const DETAIL_FIELDS: &[&str] = &[
    "id",
    "date_created",
    "date_updated",
    "main_image.id",
    "main_image.description",
    "translations.languages_code",
    "translations.slug",
    "translations.title",
    "translations.body",
    "categories.id",
    "categories.news_categories_id.translations.slug",
    "categories.news_categories_id.translations.name",
];

/// Options of a news listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    /// Page size
    pub limit: u32,
    /// 1-based page number
    pub page: u32,
    /// Only entries in this category
    pub category_id: Option<i64>,
    /// Only entries with a main image
    pub with_image_only: bool,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            page: 1,
            category_id: None,
            with_image_only: false,
        }
    }
}

impl Localized for NewsTranslation {
    fn language_code(&self) -> Option<&str> {
        self.languages_code.as_deref()
    }
}

impl Translatable for RawNewsEntry {
    type Translation = NewsTranslation;
    type Flattened = NewsEntry;

    fn entry_label(&self) -> String {
        match &self.id {
            Some(id) => format!("News entry {id}"),
            None => "News entry".to_string(),
        }
    }

    fn translations(&self) -> &[NewsTranslation] {
        self.translations.as_deref().unwrap_or(&[])
    }

    fn merge_translation(self, translation: NewsTranslation) -> NewsEntry {
        let categories = self
            .categories
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(reshape_category)
            .collect();

        NewsEntry {
            id: self.id,
            date_created: self.date_created,
            date_updated: self.date_updated,
            main_image: self.main_image,
            languages_code: translation.languages_code.unwrap_or_default(),
            slug: translation.slug,
            title: translation.title,
            body: translation.body,
            categories,
        }
    }
}

/// Categories come back pre-filtered to the current locale, so the first
/// translation is the one to show. No fallback is attempted.
fn reshape_category(link: RawCategoryLink) -> NewsCategory {
    let translation = link
        .news_categories_id
        .and_then(|category| category.translations)
        .and_then(|translations| translations.into_iter().next());

    NewsCategory {
        id: link.id,
        slug: translation.as_ref().and_then(|t| t.slug.clone()),
        name: translation.and_then(|t| t.name),
    }
}

/// Row filter of a news listing
#[must_use]
pub fn news_filter(query: &NewsQuery) -> Filter {
    Filter::all()
        .with(Filter::field("status").eq("published"))
        .with_opt(query.category_id.map(|id| Filter::field("categories.id").eq(id)))
        .with_opt(query.with_image_only.then(|| Filter::field("main_image").not_null()))
}

/// Restrict category translations to `locale` on the server
#[must_use]
pub fn category_translations_deep(locale: &str) -> serde_json::Value {
    deep(
        "categories.news_categories_id.translations",
        &Filter::field("languages_code").eq(locale),
    )
}

/// Full query of a news listing
#[must_use]
pub fn list_query(query: &NewsQuery, locale: &str) -> ItemsQuery {
    ItemsQuery::select(LIST_FIELDS)
        .paginate(query.limit, query.page)
        .counted()
        .filter(news_filter(query))
        .deep(category_translations_deep(locale))
}

/// Full query of a single news entry
#[must_use]
pub fn detail_query(locale: &str) -> ItemsQuery {
    ItemsQuery::select(DETAIL_FIELDS).deep(category_translations_deep(locale))
}

/// Flatten a page of raw entries, dropping the ones no candidate locale covers
pub fn flatten_news_list(
    entries: Vec<Option<RawNewsEntry>>,
    candidates: &LocaleCandidates,
) -> Vec<NewsEntry> {
    entries
        .into_iter()
        .flatten()
        .filter_map(|entry| {
            if entry.translations().is_empty() {
                debug!(entry = %entry.entry_label(), "Skipping news entry without translations");
                return None;
            }

            let label = entry.entry_label();
            match resolve_translation(entry, candidates) {
                Resolution::Found { value, locale, fell_back } => {
                    if fell_back {
                        metrics().increment(names::LOCALE_FALLBACK);
                        debug!(entry = %label, locale = %locale, "Serving news entry in fallback locale");
                    }
                    Some(value)
                }
                Resolution::NotFound => {
                    metrics().increment(names::ENTRY_DROPPED);
                    warn!(entry = %label, "News entry not available in default locale, discarding it");
                    None
                }
            }
        })
        .collect()
}

/// Flatten a single raw entry; every failure is fatal
pub fn flatten_one_news(entry: RawNewsEntry, candidates: &LocaleCandidates) -> ApiResult<NewsEntry> {
    if entry.translations().is_empty() {
        return Err(TranslationError::NoTranslations.into());
    }

    let id = entry.id.as_ref().map(ToString::to_string).unwrap_or_default();

    match resolve_translation(entry, candidates) {
        Resolution::Found { value, fell_back, .. } => {
            if fell_back {
                metrics().increment(names::LOCALE_FALLBACK);
            }
            Ok(value)
        }
        Resolution::NotFound => Err(ApiError::NotAvailableInDefaultLocale {
            resource: "News entry".to_string(),
            id,
            locale: candidates.iter().last().unwrap_or_default().to_string(),
        }),
    }
}

/// Localized name of `category_id` as seen on the first entry of a page
#[must_use]
pub fn filtered_category_name(news: &[NewsEntry], category_id: i64) -> Option<String> {
    news.first()?
        .categories
        .iter()
        .find(|category| category.id.as_ref().is_some_and(|id| id.matches_number(category_id)))
        .and_then(|category| category.name.clone())
}
