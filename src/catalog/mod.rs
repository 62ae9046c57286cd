//! Searchable catalogs
//!
//! Catalogs are read-only lists compiled into the binary. Searching never
//! touches the list itself; it derives the visible subset from a
//! [`QueryState`], keeping the original order.

mod data;

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{MatchMode, SearchConfig};
use crate::content::ViewNode;

pub use data::{Difficulty, HookEntry, InterviewQuestion, Snippet, HOOKS, QUESTIONS, SNIPPETS};

/// A record that can be searched by text and narrowed by category
pub trait Filterable {
    /// Fields the free-text query is matched against
    fn search_fields(&self) -> Vec<&str>;

    /// Category tags; matched exactly against selected categories
    fn categories(&self) -> Vec<&str>;
}

/// A catalog record that knows how to present itself
pub trait CatalogEntry: Filterable + Serialize {
    /// One-line label for listings
    fn label(&self) -> &str;

    fn card(&self) -> ViewNode;
}

/// Free-text query plus selected categories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub text: String,
    pub categories: BTreeSet<String>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    /// Select a category, or deselect it if already selected
    pub fn toggle_category(&mut self, category: &str) {
        if !self.categories.remove(category) {
            self.categories.insert(category.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.categories.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.categories.is_empty()
    }
}

/// How queries are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    pub trim_query: bool,
    pub match_mode: MatchMode,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchPolicy {
    fn from(config: &SearchConfig) -> Self {
        Self {
            trim_query: config.trim_query,
            match_mode: config.match_mode,
        }
    }
}

impl SearchPolicy {
    fn needle(&self, text: &str) -> String {
        let text = if self.trim_query { text.trim() } else { text };
        text.to_lowercase()
    }
}

/// Visible subset of `candidates` for `query`, in original order
pub fn filter<'a, T: Filterable>(
    candidates: &'a [T],
    query: &QueryState,
    policy: &SearchPolicy,
) -> Vec<&'a T> {
    let needle = policy.needle(&query.text);
    candidates
        .iter()
        .filter(|record| {
            matches_text(*record, &needle, policy.match_mode)
                && matches_categories(*record, &query.categories)
        })
        .collect()
}

fn matches_text<T: Filterable>(record: &T, needle: &str, mode: MatchMode) -> bool {
    if needle.is_empty() {
        return true;
    }
    let mut fields = record
        .search_fields()
        .into_iter()
        .map(|field| field.to_lowercase().contains(needle));
    match mode {
        MatchMode::Any => fields.any(|hit| hit),
        MatchMode::All => fields.all(|hit| hit),
    }
}

fn matches_categories<T: Filterable>(record: &T, selected: &BTreeSet<String>) -> bool {
    selected.is_empty()
        || record
            .categories()
            .into_iter()
            .any(|category| selected.contains(category))
}

/// Category -> number of records, in order of first appearance
pub fn category_counts<T: Filterable>(items: &[T]) -> IndexMap<String, usize> {
    let mut counts = IndexMap::new();
    for item in items {
        for category in item.categories() {
            *counts.entry(category.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

#[derive(Debug, Error)]
#[error("unknown catalog: {0} (available: questions, snippets, hooks)")]
pub struct UnknownCatalog(pub String);

/// The built-in catalogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Questions,
    Snippets,
    Hooks,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 3] = [
        CatalogKind::Questions,
        CatalogKind::Snippets,
        CatalogKind::Hooks,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CatalogKind::Questions => "questions",
            CatalogKind::Snippets => "snippets",
            CatalogKind::Hooks => "hooks",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CatalogKind::Questions => "Interview Questions",
            CatalogKind::Snippets => "Code Snippets",
            CatalogKind::Hooks => "React Hooks",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CatalogKind::Questions => QUESTIONS.len(),
            CatalogKind::Snippets => SNIPPETS.len(),
            CatalogKind::Hooks => HOOKS.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn categories(&self) -> IndexMap<String, usize> {
        match self {
            CatalogKind::Questions => category_counts(QUESTIONS),
            CatalogKind::Snippets => category_counts(SNIPPETS),
            CatalogKind::Hooks => category_counts(HOOKS),
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CatalogKind {
    type Err = UnknownCatalog;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "questions" | "question" | "interview" => Ok(CatalogKind::Questions),
            "snippets" | "snippet" => Ok(CatalogKind::Snippets),
            "hooks" | "hook" => Ok(CatalogKind::Hooks),
            _ => Err(UnknownCatalog(s.to_string())),
        }
    }
}

/// Matches of one search, ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub kind: CatalogKind,
    pub total: usize,
    pub labels: Vec<String>,
    pub cards: Vec<ViewNode>,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Search a built-in catalog
pub fn search(kind: CatalogKind, query: &QueryState, policy: &SearchPolicy) -> SearchOutcome {
    match kind {
        CatalogKind::Questions => outcome(kind, QUESTIONS, query, policy),
        CatalogKind::Snippets => outcome(kind, SNIPPETS, query, policy),
        CatalogKind::Hooks => outcome(kind, HOOKS, query, policy),
    }
}

fn outcome<T: CatalogEntry>(
    kind: CatalogKind,
    items: &[T],
    query: &QueryState,
    policy: &SearchPolicy,
) -> SearchOutcome {
    let hits = filter(items, query, policy);
    SearchOutcome {
        kind,
        total: items.len(),
        labels: hits.iter().map(|hit| hit.label().to_string()).collect(),
        cards: hits.iter().map(|hit| tagged_card(*hit)).collect(),
    }
}

/// Card carrying its search fields and categories for in-page filtering
fn tagged_card<T: CatalogEntry>(entry: &T) -> ViewNode {
    entry
        .card()
        .attr(
            "data-fields",
            serde_json::Value::from(entry.search_fields()).to_string(),
        )
        .attr(
            "data-categories",
            serde_json::Value::from(entry.categories()).to_string(),
        )
}

/// Search results as JSON, for the API and `--json` output
pub fn search_json(kind: CatalogKind, query: &QueryState, policy: &SearchPolicy) -> serde_json::Value {
    match kind {
        CatalogKind::Questions => results_json(kind, QUESTIONS, query, policy),
        CatalogKind::Snippets => results_json(kind, SNIPPETS, query, policy),
        CatalogKind::Hooks => results_json(kind, HOOKS, query, policy),
    }
}

fn results_json<T: CatalogEntry>(
    kind: CatalogKind,
    items: &[T],
    query: &QueryState,
    policy: &SearchPolicy,
) -> serde_json::Value {
    let results = filter(items, query, policy);
    serde_json::json!({
        "catalog": kind.name(),
        "query": query.text,
        "categories": query.categories,
        "total": items.len(),
        "count": results.len(),
        "results": results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Fruit {
        name: &'static str,
        note: &'static str,
        tags: Vec<&'static str>,
    }

    impl Filterable for Fruit {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.name, self.note]
        }

        fn categories(&self) -> Vec<&str> {
            self.tags.clone()
        }
    }

    fn fruit(name: &'static str) -> Fruit {
        Fruit {
            name,
            note: "",
            tags: Vec::new(),
        }
    }

    fn fruits() -> Vec<Fruit> {
        vec![fruit("Apple"), fruit("Banana"), fruit("Cherry")]
    }

    #[test]
    fn test_substring_is_case_insensitive() {
        let items = fruits();
        let policy = SearchPolicy::default();
        let result = filter(&items, &QueryState::new().with_text("an"), &policy);
        assert_eq!(result, vec![&items[1]]);
        let result = filter(&items, &QueryState::new().with_text("CHER"), &policy);
        assert_eq!(result, vec![&items[2]]);
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let items = fruits();
        let result = filter(&items, &QueryState::new(), &SearchPolicy::default());
        let expected: Vec<&Fruit> = items.iter().collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_no_match_is_empty() {
        let items = fruits();
        let result = filter(
            &items,
            &QueryState::new().with_text("durian"),
            &SearchPolicy::default(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_filter_is_pure() {
        let items = fruits();
        let before = items.clone();
        let query = QueryState::new().with_text("a");
        let policy = SearchPolicy::default();
        let first = filter(&items, &query, &policy);
        let second = filter(&items, &query, &policy);
        assert_eq!(first, second);
        assert_eq!(items, before);
    }

    #[test]
    fn test_categories_or_and_text() {
        let items = vec![
            Fruit {
                name: "one",
                note: "",
                tags: vec!["A"],
            },
            Fruit {
                name: "two",
                note: "",
                tags: vec!["B"],
            },
            Fruit {
                name: "three",
                note: "",
                tags: vec!["A", "B"],
            },
            Fruit {
                name: "four",
                note: "",
                tags: vec!["C"],
            },
        ];
        let policy = SearchPolicy::default();

        let only_b = filter(&items, &QueryState::new().with_category("B"), &policy);
        let names: Vec<_> = only_b.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["two", "three"]);

        let a_or_c = QueryState::new().with_category("A").with_category("C");
        let names: Vec<_> = filter(&items, &a_or_c, &policy)
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["one", "three", "four"]);

        // text AND category
        let query = QueryState::new().with_text("o").with_category("B");
        let names: Vec<_> = filter(&items, &query, &policy)
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["two"]);

        // category names are exact
        let lower = filter(&items, &QueryState::new().with_category("b"), &policy);
        assert!(lower.is_empty());
    }

    #[test]
    fn test_trim_policy() {
        let items = fruits();
        let query = QueryState::new().with_text("  apple ");
        assert_eq!(filter(&items, &query, &SearchPolicy::default()).len(), 1);

        let strict = SearchPolicy {
            trim_query: false,
            match_mode: MatchMode::Any,
        };
        assert!(filter(&items, &query, &strict).is_empty());
        let blank = QueryState::new().with_text("   ");
        assert_eq!(filter(&items, &blank, &SearchPolicy::default()).len(), 3);
    }

    #[test]
    fn test_match_mode_all() {
        let items = vec![
            Fruit {
                name: "Lemon",
                note: "lemon curd",
                tags: vec![],
            },
            Fruit {
                name: "Lemon",
                note: "sour",
                tags: vec![],
            },
        ];
        let query = QueryState::new().with_text("lemon");
        assert_eq!(filter(&items, &query, &SearchPolicy::default()).len(), 2);
        let all = SearchPolicy {
            trim_query: true,
            match_mode: MatchMode::All,
        };
        assert_eq!(filter(&items, &query, &all), vec![&items[0]]);
    }

    #[test]
    fn test_query_state_toggle_and_clear() {
        let mut query = QueryState::new().with_text("hook");
        query.toggle_category("React");
        assert!(query.categories.contains("React"));
        query.toggle_category("React");
        assert!(query.categories.is_empty());
        query.toggle_category("Node.js");
        query.clear();
        assert!(query.is_empty());
    }

    #[test]
    fn test_catalog_kind_parse() {
        assert_eq!("hooks".parse::<CatalogKind>().unwrap(), CatalogKind::Hooks);
        assert_eq!(
            "Questions".parse::<CatalogKind>().unwrap(),
            CatalogKind::Questions
        );
        let err = "recipes".parse::<CatalogKind>().unwrap_err();
        assert!(err.to_string().contains("recipes"));
    }

    #[test]
    fn test_builtin_catalogs_have_categories() {
        for kind in CatalogKind::ALL {
            assert!(!kind.is_empty(), "{} is empty", kind);
            let counts = kind.categories();
            assert!(!counts.is_empty());
            assert!(
                counts.values().sum::<usize>() >= kind.len(),
                "every {} entry has a category",
                kind
            );
        }
    }

    #[test]
    fn test_search_json_shape() {
        let query = QueryState::new().with_text("useState");
        let json = search_json(CatalogKind::Hooks, &query, &SearchPolicy::default());
        assert_eq!(json["catalog"], "hooks");
        assert_eq!(json["total"], HOOKS.len());
        assert!(json["count"].as_u64().unwrap() >= 1);
        assert_eq!(json["results"][0]["name"], "useState");
    }

    #[test]
    fn test_search_outcome_labels_follow_catalog_order() {
        let query = QueryState::new().with_category("Performance");
        let outcome = search(CatalogKind::Hooks, &query, &SearchPolicy::default());
        assert_eq!(outcome.labels, vec!["useMemo", "useCallback", "useTransition"]);
        assert_eq!(outcome.cards.len(), 3);
        assert_eq!(outcome.total, HOOKS.len());

        let none = search(
            CatalogKind::Hooks,
            &QueryState::new().with_text("zzz"),
            &SearchPolicy::default(),
        );
        assert!(none.is_empty());
    }

    #[test]
    fn test_questions_filter_by_category() {
        let query = QueryState::new().with_category("Node.js");
        let hits = filter(QUESTIONS, &query, &SearchPolicy::default());
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|q| q.category == "Node.js"));
    }

    #[test]
    fn test_cards_carry_filter_data() {
        let query = QueryState::new().with_text("useMemo");
        let outcome = search(CatalogKind::Hooks, &query, &SearchPolicy::default());
        let card = &outcome.cards[0];
        let fields: Vec<String> =
            serde_json::from_str(card.get_attr("data-fields").unwrap()).unwrap();
        assert_eq!(fields[0], "useMemo");
        assert_eq!(card.get_attr("data-categories"), Some(r#"["Performance"]"#));
    }
}
