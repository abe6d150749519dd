//! Query string for the events listing

use eventforge_domain::constants::EVENT_ORDER_BY;
use eventforge_domain::EventQuery;

/// Escape a literal for use inside a single-quoted filter string.
pub fn escape_filter_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Free-text filter over the remote text index.
pub fn text_filter(term: &str) -> String {
    format!("substringof('{}',TextIndex)", escape_filter_literal(term))
}

/// Query pairs for `GET /accounts/{a}/events`, in a stable order.
pub fn event_query_pairs(query: &EventQuery) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::with_capacity(6);

    if let Some(term) = query.search_term() {
        pairs.push(("$filter", text_filter(term)));
    }
    pairs.push(("$orderby", EVENT_ORDER_BY.to_string()));

    if let Some(from) = &query.start_date_from {
        pairs.push(("StartDate", from.clone()));
    }
    if let Some(to) = &query.end_date_to {
        pairs.push(("EndDate", to.clone()));
    }

    pairs.push(("$top", query.page_size().to_string()));
    if let Some(skip) = query.skip {
        pairs.push(("$skip", skip.to_string()));
    }

    pairs
}
