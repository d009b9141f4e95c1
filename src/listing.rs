//! Derived listing state: fuzzy text filter, status filter, typed sort.
//!
//! Pure and synchronous; nothing here is persisted. The HTTP layer maps
//! query parameters onto a [`ListingQuery`] and applies it to a fresh
//! snapshot from the item store.

use std::cmp::Ordering;

use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use poem_openapi::Enum;

use crate::lifecycle::ItemStatus;
use crate::types::db::item;

/// Sortable columns, each mapped to an explicit accessor below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[oai(rename_all = "snake_case")]
pub enum SortColumn {
    Description,
    Status,
    CreatedAt,
    ReservedBy,
    RetrievedBy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[oai(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Single-column sort selection with the dashboard's toggle semantics:
/// selecting the active column flips direction, selecting a different
/// column resets to ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == column {
            self.direction = match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            *self = Self::new(column);
        }
    }
}

/// One listing request's worth of derived-state parameters.
#[derive(Debug, Default)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub status: Option<ItemStatus>,
    pub sort: Option<SortState>,
    /// Admin view also matches reserver/retriever names and emails.
    pub match_contacts: bool,
}

/// Apply filter and sort to a snapshot. Items arrive newest-first from the
/// store and keep that order when no sort is selected.
pub fn filter_and_sort(items: Vec<item::Model>, query: &ListingQuery) -> Vec<item::Model> {
    let mut items: Vec<item::Model> = match &query.status {
        Some(status) => items
            .into_iter()
            .filter(|m| m.status == status.as_str())
            .collect(),
        None => items,
    };

    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let mut matcher = Matcher::new(Config::DEFAULT);
        let pattern = Pattern::parse(search, CaseMatching::Ignore, Normalization::Smart);
        items.retain(|m| {
            let haystack = search_text(m, query.match_contacts);
            fuzzy_matches(&mut matcher, &pattern, search, &haystack)
        });
    }

    if let Some(sort) = query.sort {
        items.sort_by(|a, b| compare(a, b, sort));
    }

    items
}

fn search_text(m: &item::Model, match_contacts: bool) -> String {
    if !match_contacts {
        return m.description.clone();
    }
    let mut text = m.description.clone();
    for field in [
        &m.reserved_by_name,
        &m.reserved_by_email,
        &m.retrieved_by_name,
        &m.retrieved_by_email,
    ]
    .into_iter()
    .flatten()
    {
        text.push(' ');
        text.push_str(field);
    }
    text
}

/// Approximate match: nucleo subsequence scoring first, then a per-token
/// one-edit fallback so a single altered character still matches.
fn fuzzy_matches(matcher: &mut Matcher, pattern: &Pattern, query: &str, text: &str) -> bool {
    let mut buf = Vec::new();
    if pattern.score(Utf32Str::new(text, &mut buf), matcher).is_some() {
        return true;
    }

    query.split_whitespace().all(|query_token| {
        let query_token = query_token.to_lowercase();
        text.split_whitespace()
            .any(|text_token| within_one_edit(&query_token, &text_token.to_lowercase()))
    })
}

fn within_one_edit(a: &str, b: &str) -> bool {
    levenshtein(a, b) <= 1
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }
    prev[b.len()]
}

fn compare(a: &item::Model, b: &item::Model, sort: SortState) -> Ordering {
    match sort.column {
        SortColumn::CreatedAt => {
            let ord = a.created_at.cmp(&b.created_at);
            directed(ord, sort.direction)
        }
        SortColumn::Description => {
            compare_text(Some(&a.description), Some(&b.description), sort.direction)
        }
        SortColumn::Status => compare_text(Some(&a.status), Some(&b.status), sort.direction),
        SortColumn::ReservedBy => compare_text(
            a.reserved_by_name.as_deref(),
            b.reserved_by_name.as_deref(),
            sort.direction,
        ),
        SortColumn::RetrievedBy => compare_text(
            a.retrieved_by_name.as_deref(),
            b.retrieved_by_name.as_deref(),
            sort.direction,
        ),
    }
}

/// Textual comparison, case-folded, missing values last regardless of
/// direction.
fn compare_text(a: Option<&str>, b: Option<&str>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ord = a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b));
            directed(ord, direction)
        }
    }
}

fn directed(ord: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(description: &str, status: ItemStatus, reserved_by: Option<&str>) -> item::Model {
        item::Model {
            id: description.to_string(),
            description: description.to_string(),
            image_url: String::new(),
            thumbnail_url: None,
            status: status.as_str().to_string(),
            created_at: 0,
            reserved_by_name: reserved_by.map(str::to_string),
            reserved_by_email: reserved_by.map(|n| format!("{n}@example.com")),
            retrieved_by_name: None,
            retrieved_by_email: None,
            is_archived: false,
        }
    }

    fn descriptions(items: &[item::Model]) -> Vec<&str> {
        items.iter().map(|m| m.description.as_str()).collect()
    }

    #[test]
    fn search_tolerates_one_altered_character() {
        let items = vec![model("Blue Nike bottle", ItemStatus::ToCollect, None)];
        let query = ListingQuery {
            search: Some("botXle".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(items, &query).len(), 1);
    }

    #[test]
    fn unrelated_query_matches_nothing() {
        let items = vec![model("Blue Nike bottle", ItemStatus::ToCollect, None)];
        let query = ListingQuery {
            search: Some("skateboard".to_string()),
            ..Default::default()
        };
        assert!(filter_and_sort(items, &query).is_empty());
    }

    #[test]
    fn contact_fields_only_match_in_admin_view() {
        let items = || vec![model("Umbrella", ItemStatus::Reserved, Some("Ana"))];

        let public = ListingQuery {
            search: Some("ana".to_string()),
            ..Default::default()
        };
        assert!(filter_and_sort(items(), &public).is_empty());

        let admin = ListingQuery {
            search: Some("ana".to_string()),
            match_contacts: true,
            ..Default::default()
        };
        assert_eq!(filter_and_sort(items(), &admin).len(), 1);
    }

    #[test]
    fn status_filter_restricts_the_visible_set() {
        let items = vec![
            model("a", ItemStatus::ToCollect, None),
            model("b", ItemStatus::Reserved, Some("Ana")),
        ];
        let query = ListingQuery {
            status: Some(ItemStatus::Reserved),
            ..Default::default()
        };
        assert_eq!(descriptions(&filter_and_sort(items, &query)), vec!["b"]);
    }

    #[test]
    fn toggle_same_column_reverses_direction() {
        let mut sort = SortState::new(SortColumn::Description);
        assert_eq!(sort.direction, SortDirection::Asc);

        sort.toggle(SortColumn::Description);
        assert_eq!(sort.direction, SortDirection::Desc);

        sort.toggle(SortColumn::Description);
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn toggle_new_column_resets_to_ascending() {
        let mut sort = SortState::new(SortColumn::Description);
        sort.toggle(SortColumn::Description);
        assert_eq!(sort.direction, SortDirection::Desc);

        sort.toggle(SortColumn::CreatedAt);
        assert_eq!(sort.column, SortColumn::CreatedAt);
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn sort_is_case_insensitive() {
        let items = vec![
            model("banana", ItemStatus::ToCollect, None),
            model("Apple", ItemStatus::ToCollect, None),
        ];
        let query = ListingQuery {
            sort: Some(SortState::new(SortColumn::Description)),
            ..Default::default()
        };
        assert_eq!(
            descriptions(&filter_and_sort(items, &query)),
            vec!["Apple", "banana"]
        );
    }

    #[test]
    fn missing_values_sort_last_in_both_directions() {
        let items = || {
            vec![
                model("unreserved", ItemStatus::ToCollect, None),
                model("by-ana", ItemStatus::Reserved, Some("Ana")),
                model("by-zoe", ItemStatus::Reserved, Some("Zoe")),
            ]
        };

        let asc = ListingQuery {
            sort: Some(SortState {
                column: SortColumn::ReservedBy,
                direction: SortDirection::Asc,
            }),
            ..Default::default()
        };
        assert_eq!(
            descriptions(&filter_and_sort(items(), &asc)),
            vec!["by-ana", "by-zoe", "unreserved"]
        );

        let desc = ListingQuery {
            sort: Some(SortState {
                column: SortColumn::ReservedBy,
                direction: SortDirection::Desc,
            }),
            ..Default::default()
        };
        assert_eq!(
            descriptions(&filter_and_sort(items(), &desc)),
            vec!["by-zoe", "by-ana", "unreserved"]
        );
    }

    #[test]
    fn one_edit_distance_bound() {
        assert!(within_one_edit("bottle", "bottle"));
        assert!(within_one_edit("botxle", "bottle"));
        assert!(within_one_edit("botle", "bottle"));
        assert!(!within_one_edit("botxxe", "bottle"));
    }
}
