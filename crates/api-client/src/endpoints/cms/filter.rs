//! Query building for the CMS `/items` endpoints
//!
//! Directus filters are nested JSON objects keyed by field path:
//!
//! ```json
//! {"_and": [{"status": {"_eq": "published"}}, {"categories": {"id": {"_eq": 3}}}]}
//! ```
//!
//! [`Filter`] builds those from dotted field paths so callers never splice
//! JSON by hand.

use serde_json::{Map, Value};

/// Comparison operator of a single predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Equal
    Eq,
    /// Not equal
    Neq,
    /// Greater than or equal
    Gte,
    /// Less than or equal
    Lte,
    /// Field is null
    Null,
    /// Field is not null
    NotNull,
}

impl Operator {
    /// Wire name of the operator
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "_eq",
            Self::Neq => "_neq",
            Self::Gte => "_gte",
            Self::Lte => "_lte",
            Self::Null => "_null",
            Self::NotNull => "_nnull",
        }
    }
}

/// A filter expression
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// All terms must hold
    And(Vec<Filter>),
    /// At least one term must hold
    Or(Vec<Filter>),
    /// A single predicate on a (possibly nested) field
    Field {
        /// Field path, outermost first
        path: Vec<String>,
        /// Comparison
        op: Operator,
        /// Operand
        value: Value,
    },
}

/// Predicate builder for one field path
#[derive(Debug, Clone)]
pub struct FieldRef {
    path: Vec<String>,
}

impl FieldRef {
    fn predicate(self, op: Operator, value: Value) -> Filter {
        Filter::Field {
            path: self.path,
            op,
            value,
        }
    }

    /// `field == value`
    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> Filter {
        self.predicate(Operator::Eq, value.into())
    }

    /// `field != value`
    #[must_use]
    pub fn neq(self, value: impl Into<Value>) -> Filter {
        self.predicate(Operator::Neq, value.into())
    }

    /// `field >= value`
    #[must_use]
    pub fn gte(self, value: impl Into<Value>) -> Filter {
        self.predicate(Operator::Gte, value.into())
    }

    /// `field <= value`
    #[must_use]
    pub fn lte(self, value: impl Into<Value>) -> Filter {
        self.predicate(Operator::Lte, value.into())
    }

    /// `field IS NULL`
    #[must_use]
    pub fn is_null(self) -> Filter {
        self.predicate(Operator::Null, Value::Bool(true))
    }

    /// `field IS NOT NULL`
    #[must_use]
    pub fn not_null(self) -> Filter {
        self.predicate(Operator::NotNull, Value::Bool(true))
    }
}

impl Filter {
    /// Start a predicate on a dotted field path such as `categories.id`
    #[must_use]
    pub fn field(path: &str) -> FieldRef {
        FieldRef {
            path: path.split('.').map(str::to_string).collect(),
        }
    }

    /// Empty conjunction, to be extended with [`Filter::with`]
    #[must_use]
    pub fn all() -> Self {
        Self::And(Vec::new())
    }

    /// Conjunction of the given terms
    #[must_use]
    pub fn and(terms: impl IntoIterator<Item = Filter>) -> Self {
        Self::And(terms.into_iter().collect())
    }

    /// Disjunction of the given terms
    #[must_use]
    pub fn or(terms: impl IntoIterator<Item = Filter>) -> Self {
        Self::Or(terms.into_iter().collect())
    }

    /// Add a term. A non-conjunction is wrapped into one first.
    #[must_use]
    pub fn with(self, term: Filter) -> Self {
        match self {
            Self::And(mut terms) => {
                terms.push(term);
                Self::And(terms)
            }
            other => Self::And(vec![other, term]),
        }
    }

    /// Add a term if there is one
    #[must_use]
    pub fn with_opt(self, term: Option<Filter>) -> Self {
        match term {
            Some(term) => self.with(term),
            None => self,
        }
    }

    /// JSON form sent as the `filter` query parameter
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::And(terms) => single("_and", Value::Array(terms.iter().map(Self::to_json).collect())),
            Self::Or(terms) => single("_or", Value::Array(terms.iter().map(Self::to_json).collect())),
            Self::Field { path, op, value } => {
                nest(path, single(op.as_str(), value.clone()))
            }
        }
    }
}

/// `deep` parameter restricting a nested relation with `filter`
///
/// `deep("translations", f)` yields `{"translations": {"_filter": f}}`.
#[must_use]
pub fn deep(path: &str, filter: &Filter) -> Value {
    let path: Vec<String> = path.split('.').map(str::to_string).collect();
    nest(&path, single("_filter", filter.to_json()))
}

fn single(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

fn nest(path: &[String], leaf: Value) -> Value {
    path.iter().rev().fold(leaf, |inner, key| single(key, inner))
}

/// Query string of an `/items/<collection>` read
#[derive(Debug, Clone, Default)]
pub struct ItemsQuery {
    /// Page size
    pub limit: Option<u32>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Ask for `meta=filter_count`
    pub with_count: bool,
    /// Fields to select, dotted for relations
    pub fields: Vec<String>,
    /// Row filter
    pub filter: Option<Filter>,
    /// Nested relation filters
    pub deep: Option<Value>,
}

impl ItemsQuery {
    /// Query selecting `fields`
    #[must_use]
    pub fn select(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            ..Self::default()
        }
    }

    /// Set page size and page number
    #[must_use]
    pub fn paginate(mut self, limit: u32, page: u32) -> Self {
        self.limit = Some(limit);
        self.page = Some(page);
        self
    }

    /// Request the filtered total count
    #[must_use]
    pub fn counted(mut self) -> Self {
        self.with_count = true;
        self
    }

    /// Set the row filter
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the nested relation filters
    #[must_use]
    pub fn deep(mut self, deep: Value) -> Self {
        self.deep = Some(deep);
        self
    }

    /// Render as query-string pairs
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        if self.with_count {
            params.push(("meta".to_string(), "filter_count".to_string()));
        }
        if !self.fields.is_empty() {
            params.push(("fields".to_string(), self.fields.join(",")));
        }
        if let Some(filter) = &self.filter {
            params.push(("filter".to_string(), filter.to_json().to_string()));
        }
        if let Some(deep) = &self.deep {
            params.push(("deep".to_string(), deep.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_field_predicate() {
        let filter = Filter::field("categories.id").eq(3);
        assert_eq!(filter.to_json(), json!({"categories": {"id": {"_eq": 3}}}));
    }

    #[test]
    fn test_conjunction() {
        let filter = Filter::all()
            .with(Filter::field("status").eq("published"))
            .with_opt(None)
            .with_opt(Some(Filter::field("main_image").not_null()));

        assert_eq!(
            filter.to_json(),
            json!({"_and": [
                {"status": {"_eq": "published"}},
                {"main_image": {"_nnull": true}},
            ]})
        );
    }

    #[test]
    fn test_with_wraps_single_term() {
        let filter = Filter::field("a").eq(1).with(Filter::field("b").eq(2));
        assert!(matches!(filter, Filter::And(ref terms) if terms.len() == 2));
    }

    #[test]
    fn test_disjunction() {
        let filter = Filter::or([Filter::field("slug").eq("u17"), Filter::field("translations.slug").eq("u17")]);
        assert_eq!(
            filter.to_json(),
            json!({"_or": [
                {"slug": {"_eq": "u17"}},
                {"translations": {"slug": {"_eq": "u17"}}},
            ]})
        );
    }

    #[test]
    fn test_deep() {
        let value = deep(
            "categories.news_categories_id.translations",
            &Filter::field("languages_code").eq("de"),
        );
        assert_eq!(
            value,
            json!({"categories": {"news_categories_id": {"translations": {"_filter": {"languages_code": {"_eq": "de"}}}}}})
        );
    }

    #[test]
    fn test_params_order_and_encoding() {
        let params = ItemsQuery::select(&["id", "translations.*"])
            .paginate(3, 2)
            .counted()
            .filter(Filter::field("status").eq("published"))
            .to_params();

        let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["limit", "page", "meta", "fields", "filter"]);
        assert_eq!(params[3].1, "id,translations.*");
        assert_eq!(params[4].1, r#"{"status":{"_eq":"published"}}"#);
    }

    #[test]
    fn test_empty_query_has_no_params() {
        assert!(ItemsQuery::default().to_params().is_empty());
    }
}
