//! Flattening multi-locale CMS entries into one locale
//!
//! Every translatable collection stores its localized fields in a list of
//! translation records tagged with a `languages_code`. An entry is served in
//! a single locale: the translation for that locale is merged over the
//! entry's base fields and the translation list disappears from the result.
//!
//! [`resolve_translation`] tries each candidate locale in order and reports
//! which one produced the result.

use crate::error::TranslationError;
use clubhouse_core::locale::{first_match, LocaleCandidates, Resolution};
use tracing::warn;

/// A translation record
pub trait Localized {
    /// Locale of the record, if set
    fn language_code(&self) -> Option<&str>;
}

/// An entry with per-locale translation records
pub trait Translatable: Sized {
    /// Shape of one translation record
    type Translation: Localized + Clone;

    /// Shape of the entry once merged with a translation
    type Flattened;

    /// Human-readable label for logs
    fn entry_label(&self) -> String;

    /// All translation records, empty if there are none
    fn translations(&self) -> &[Self::Translation];

    /// Merge `translation` over the base fields, dropping the translation list
    fn merge_translation(self, translation: Self::Translation) -> Self::Flattened;
}

/// Find the translation record for `language`
pub fn find_translation<'a, T: Localized>(
    translations: &'a [T],
    language: &str,
) -> Result<&'a T, TranslationError> {
    if translations.is_empty() {
        return Err(TranslationError::NoTranslations);
    }

    translations
        .iter()
        .find(|t| t.language_code() == Some(language))
        .ok_or_else(|| TranslationError::MissingLocale(language.to_string()))
}

/// Flatten `entry` into `language`
pub fn flatten_for_language<E: Translatable>(
    entry: E,
    language: &str,
) -> Result<E::Flattened, TranslationError> {
    let translation = find_translation(entry.translations(), language)?.clone();
    Ok(entry.merge_translation(translation))
}

/// Flatten `entry` into the first candidate locale that has a translation
///
/// Each candidate that fails is logged at warn level.
pub fn resolve_translation<E: Translatable>(
    entry: E,
    candidates: &LocaleCandidates,
) -> Resolution<E::Flattened> {
    let label = entry.entry_label();

    let hit = first_match(candidates.iter(), |locale| {
        match find_translation(entry.translations(), locale) {
            Ok(translation) => Some((translation.clone(), locale.to_string())),
            Err(err) => {
                warn!(entry = %label, locale, error = %err, "Entry not available in locale");
                None
            }
        }
    });

    match hit {
        Some((translation, locale)) => Resolution::Found {
            fell_back: candidates.is_fallback(&locale),
            value: entry.merge_translation(translation),
            locale,
        },
        None => Resolution::NotFound,
    }
}
