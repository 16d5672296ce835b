//! Locale candidates and fallback resolution
//!
//! Content is looked up in the current request locale first and in the
//! configured default locale second. [`LocaleCandidates`] holds that order,
//! [`first_match`] walks it, and [`Resolution`] records which candidate won.

use serde::{Deserialize, Serialize};

/// Supplies the locales of the current request
pub trait LocaleProvider: Send + Sync {
    /// Locale the request asked for
    fn current_locale(&self) -> String;

    /// Locale that is always expected to be filled in
    fn default_locale(&self) -> String;

    /// Ordered lookup candidates: current first, then default
    fn candidates(&self) -> LocaleCandidates {
        LocaleCandidates::new(self.current_locale(), self.default_locale())
    }
}

/// Fixed pair of locales
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticLocales {
    current: String,
    default: String,
}

impl StaticLocales {
    /// Create a provider with a fixed current and default locale
    pub fn new(current: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            default: default.into(),
        }
    }

    /// Same default locale, different current locale
    #[must_use]
    pub fn with_current(&self, current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            default: self.default.clone(),
        }
    }
}

impl LocaleProvider for StaticLocales {
    fn current_locale(&self) -> String {
        self.current.clone()
    }

    fn default_locale(&self) -> String {
        self.default.clone()
    }
}

/// Ordered, de-duplicated list of locales to try
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCandidates {
    locales: Vec<String>,
}

impl LocaleCandidates {
    /// Build `[current, default]`, skipping blanks and duplicates
    pub fn new(current: impl Into<String>, default: impl Into<String>) -> Self {
        Self::from_ordered([current.into(), default.into()])
    }

    /// Build from any ordered list, keeping the first occurrence of each locale
    pub fn from_ordered(locales: impl IntoIterator<Item = String>) -> Self {
        let mut ordered: Vec<String> = Vec::new();
        for locale in locales {
            let locale = locale.trim().to_string();
            if !locale.is_empty() && !ordered.contains(&locale) {
                ordered.push(locale);
            }
        }
        Self { locales: ordered }
    }

    /// Iterate the candidates in lookup order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.locales.iter().map(String::as_str)
    }

    /// The preferred locale, if any
    pub fn primary(&self) -> Option<&str> {
        self.locales.first().map(String::as_str)
    }

    /// Whether `locale` is a fallback rather than the preferred locale
    pub fn is_fallback(&self, locale: &str) -> bool {
        self.primary().is_some_and(|primary| primary != locale)
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    /// Whether there is nothing to try
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}

/// Return the first candidate for which `f` yields a value
pub fn first_match<C, T, F>(candidates: impl IntoIterator<Item = C>, f: F) -> Option<T>
where
    F: FnMut(C) -> Option<T>,
{
    candidates.into_iter().find_map(f)
}

/// Outcome of a locale lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// A usable translation was found
    Found {
        /// The resolved value
        value: T,
        /// Locale that produced the value
        locale: String,
        /// Whether a locale other than the preferred one was used
        fell_back: bool,
    },
    /// No candidate locale had a translation
    NotFound,
}

impl<T> Resolution<T> {
    /// Whether a value was found
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Drop the locale information
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found { value, .. } => Some(value),
            Self::NotFound => None,
        }
    }

    /// Transform the found value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Self::Found { value, locale, fell_back } => Resolution::Found {
                value: f(value),
                locale,
                fell_back,
            },
            Self::NotFound => Resolution::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_candidates_order() {
        let candidates = LocaleCandidates::new("fr", "en");
        assert_eq!(candidates.iter().collect::<Vec<_>>(), vec!["fr", "en"]);
        assert_eq!(candidates.primary(), Some("fr"));
        assert!(candidates.is_fallback("en"));
        assert!(!candidates.is_fallback("fr"));
    }

    #[test]
    fn test_candidates_dedup_and_blank() {
        let same = LocaleCandidates::new("en", "en");
        assert_eq!(same.len(), 1);

        let blank = LocaleCandidates::new("", "de");
        assert_eq!(blank.iter().collect::<Vec<_>>(), vec!["de"]);

        let none = LocaleCandidates::new(" ", "");
        assert!(none.is_empty());
        assert!(!none.is_fallback("en"));
    }

    #[test]
    fn test_provider_candidates() {
        let locales = StaticLocales::new("de", "en");
        assert_eq!(locales.candidates(), LocaleCandidates::new("de", "en"));

        let switched = locales.with_current("fr");
        assert_eq!(switched.current_locale(), "fr");
        assert_eq!(switched.default_locale(), "en");
    }

    #[test]
    fn test_first_match_stops_at_first_hit() {
        let mut tried = Vec::new();
        let hit = first_match(["fr", "en", "de"], |locale| {
            tried.push(locale);
            (locale == "en").then_some(locale.len())
        });

        assert_eq!(hit, Some(2));
        assert_eq!(tried, vec!["fr", "en"]);
    }

    #[test]
    fn test_first_match_none() {
        let hit: Option<()> = first_match(Vec::<&str>::new(), |_| Some(()));
        assert!(hit.is_none());
    }

    #[test]
    fn test_resolution_map() {
        let found = Resolution::Found {
            value: 2,
            locale: "en".to_string(),
            fell_back: true,
        };
        assert!(found.is_found());
        assert_eq!(found.map(|v| v * 10).into_option(), Some(20));

        let missing: Resolution<i32> = Resolution::NotFound;
        assert!(!missing.is_found());
        assert_eq!(missing.into_option(), None);
    }

    proptest! {
        #[test]
        fn candidates_never_repeat(current in "[a-z]{0,3}", default in "[a-z]{0,3}") {
            let candidates = LocaleCandidates::new(current.clone(), default.clone());
            let list: Vec<&str> = candidates.iter().collect();
            prop_assert!(list.len() <= 2);
            if list.len() == 2 {
                prop_assert_ne!(list[0], list[1]);
            }
            if !current.is_empty() {
                prop_assert_eq!(candidates.primary(), Some(current.as_str()));
            }
        }
    }
}
