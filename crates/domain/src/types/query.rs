//! Event listing filters

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PAGE_SIZE;

/// Filter and paging options for listing events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    /// Free-text substring search across the event text index
    #[serde(default, alias = "q")]
    pub search: Option<String>,
    /// Inclusive lower bound for `StartDate`
    #[serde(default)]
    pub start_date_from: Option<String>,
    /// Inclusive upper bound for `EndDate`
    #[serde(default)]
    pub end_date_to: Option<String>,
    #[serde(default)]
    pub top: Option<u32>,
    #[serde(default)]
    pub skip: Option<u32>,
}

impl EventQuery {
    /// Search term with surrounding whitespace removed; `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|term| !term.is_empty())
    }

    /// Requested page size, falling back to the default.
    pub fn page_size(&self) -> u32 {
        self.top.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}
