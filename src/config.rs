//! Configuration for the coordinator.

use crate::sorting::SortDescriptor;

/// Behavior knobs for a [`Coordinator`](crate::coordinator::Coordinator).
///
/// Session-only; never persisted. Use the builder pattern:
///
/// ```
/// use vaultpane::{Category, Config, SortDescriptor, SortOrder, SortParameter};
///
/// let config = Config::new()
///     .with_default_sort(SortDescriptor::new(
///         Category::Logins,
///         SortParameter::DateModified,
///         SortOrder::Descending,
///     ))
///     .with_auto_select_first(false);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Sort descriptor the list starts with
    pub default_sort: SortDescriptor,

    /// Whether a filter change selects the first matching row
    pub auto_select_first: bool,

    /// Filter strings longer than this are truncated (characters)
    pub max_filter_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_sort: SortDescriptor::default(),
            auto_select_first: true,
            max_filter_length: 512,
        }
    }
}

impl Config {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sort descriptor the list starts with.
    pub fn with_default_sort(mut self, descriptor: SortDescriptor) -> Self {
        self.default_sort = descriptor;
        self
    }

    /// Sets whether filter changes auto-select the first matching row.
    pub fn with_auto_select_first(mut self, auto_select_first: bool) -> Self {
        self.auto_select_first = auto_select_first;
        self
    }

    /// Sets the maximum accepted filter length in characters.
    pub fn with_max_filter_length(mut self, max_filter_length: usize) -> Self {
        self.max_filter_length = max_filter_length;
        self
    }
}
