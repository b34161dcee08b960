//! View filtering
//!
//! Screens derive their lists from the store snapshot in two steps:
//! category membership, then an optional case-insensitive search over
//! name, description, and URL. Filtering is pure and recomputed on
//! demand; nothing here caches.

use crate::models::{Category, Link};

/// Which categories a screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Public,
    Private,
}

impl CategoryFilter {
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Public => category == Category::Public,
            CategoryFilter::Private => category == Category::Private,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Public => "Public",
            CategoryFilter::Private => "Private",
        }
    }
}

/// Case-insensitive substring match against name, description, or URL
///
/// An empty term matches everything.
pub fn matches_search(link: &Link, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    link.name.to_lowercase().contains(&term)
        || link
            .description
            .as_ref()
            .is_some_and(|d| d.to_lowercase().contains(&term))
        || link.url.to_lowercase().contains(&term)
}

/// Derive a screen's view: category membership first, then the search term
pub fn filter_links<'a>(
    links: &'a [Link],
    filter: CategoryFilter,
    term: &str,
) -> Vec<&'a Link> {
    links
        .iter()
        .filter(|l| filter.matches(l.category) && matches_search(l, term))
        .collect()
}
