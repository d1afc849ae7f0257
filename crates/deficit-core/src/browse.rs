//! Catalog browsing: category / favorites filter plus a text search.

use crate::catalog::{Catalog, Category, Substance};

/// Which substances a browse view shows before the search term applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
  #[default]
  All,
  Category(Category),
  Favorites,
}

impl Filter {
  /// The next filter in the order a filter bar presents them.
  pub fn next(self) -> Self {
    match self {
      Self::All => Self::Category(Category::Vitamin),
      Self::Category(Category::Vitamin) => Self::Category(Category::Mineral),
      Self::Category(Category::Mineral) => Self::Favorites,
      Self::Favorites => Self::All,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::All => "all",
      Self::Category(Category::Vitamin) => "vitamins",
      Self::Category(Category::Mineral) => "minerals",
      Self::Favorites => "favorites",
    }
  }
}

/// Substances passing `filter` and matching `term`, in catalog order.
///
/// `is_favorite` answers the favorites filter. The term matches the display
/// name as written or the scientific name case-insensitively; an empty or
/// blank term matches everything.
pub fn filter_substances<'c>(
  catalog: &'c Catalog,
  filter: Filter,
  term: &str,
  is_favorite: impl Fn(&str) -> bool,
) -> Vec<&'c Substance> {
  let term = term.trim();
  let term_lower = term.to_lowercase();

  catalog
    .substances()
    .iter()
    .filter(|s| match filter {
      Filter::All => true,
      Filter::Category(category) => s.category == category,
      Filter::Favorites => is_favorite(s.id.as_str()),
    })
    .filter(|s| {
      term.is_empty()
        || s.name.contains(term)
        || s.scientific_name.to_lowercase().contains(&term_lower)
    })
    .collect()
}
