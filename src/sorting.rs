//! Display ordering for the item list.
//!
//! A [`SortDescriptor`] is a pure description of how the list is grouped and
//! ordered. It is session-only state and is never persisted.

use serde::{Deserialize, Serialize};

/// Grouping key used to filter the list to one kind of item.
///
/// Notes have no dedicated category; they are only shown under
/// [`Category::AllItems`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Every item regardless of kind
    AllItems,
    /// Website logins
    Logins,
    /// Personal identities
    Identities,
    /// Payment cards
    Cards,
}

impl Category {
    /// Section title shown for this category in the all-items display.
    pub fn section_title(&self) -> &'static str {
        match self {
            Self::AllItems => "All Items",
            Self::Logins => "Logins",
            Self::Identities => "Identities",
            Self::Cards => "Credit Cards",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.section_title())
    }
}

/// Which field the list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortParameter {
    /// Display title, grouped by first letter
    Title,
    /// Creation date, grouped by calendar day
    DateCreated,
    /// Last-modified date, grouped by calendar day
    DateModified,
}

/// Ascending or descending order of the primary sort parameter.
///
/// Ties on the primary parameter always fall back to id-ascending order so
/// repeated renders of unchanged input are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

impl SortOrder {
    /// Applies the order to an ascending comparison result.
    pub(crate) fn apply(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// The active category, sort parameter, and order for the displayed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDescriptor {
    /// Active category filter
    pub category: Category,
    /// Field the list is ordered by
    pub parameter: SortParameter,
    /// Direction of the primary ordering
    pub order: SortOrder,
}

impl SortDescriptor {
    /// Creates a descriptor.
    pub fn new(category: Category, parameter: SortParameter, order: SortOrder) -> Self {
        Self {
            category,
            parameter,
            order,
        }
    }

    /// Returns a copy with a different category, keeping parameter and order.
    pub fn with_category(self, category: Category) -> Self {
        Self { category, ..self }
    }
}

impl Default for SortDescriptor {
    fn default() -> Self {
        Self {
            category: Category::AllItems,
            parameter: SortParameter::Title,
            order: SortOrder::Ascending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_default_descriptor() {
        let descriptor = SortDescriptor::default();
        assert_eq!(descriptor.category, Category::AllItems);
        assert_eq!(descriptor.parameter, SortParameter::Title);
        assert_eq!(descriptor.order, SortOrder::Ascending);
    }

    #[test]
    fn test_with_category_keeps_ordering() {
        let descriptor = SortDescriptor::new(
            Category::AllItems,
            SortParameter::DateModified,
            SortOrder::Descending,
        )
        .with_category(Category::Cards);

        assert_eq!(descriptor.category, Category::Cards);
        assert_eq!(descriptor.parameter, SortParameter::DateModified);
        assert_eq!(descriptor.order, SortOrder::Descending);
    }

    #[test]
    fn test_order_apply() {
        assert_eq!(SortOrder::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortOrder::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortOrder::Descending.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn test_category_titles() {
        assert_eq!(Category::Cards.section_title(), "Credit Cards");
        assert_eq!(Category::Logins.to_string(), "Logins");
    }
}
