//! Construction of arXiv search expressions and request URLs.

use url::Url;

use crate::{
    config::Criteria,
    error::{DigestError, Result},
    record::ResultKind,
};

/// Build the search expression for one result kind: the kind's field prefix
/// followed by its criteria terms joined with ` OR `.
///
/// The prefix attaches to the first term only.
pub fn build_query(kind: ResultKind, criteria: &Criteria) -> String {
    format!("{}{}", kind.field_prefix(), kind.terms(criteria).join(" OR "))
}

/// Assemble the full request URL for one query.
///
/// Results are ordered by submission date, newest first, and capped at
/// `max_results`. All parameter encoding is delegated to [`Url`].
pub fn request_url(endpoint: &str, query: &str, max_results: u32) -> Result<Url> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| DigestError::config(format!("invalid search endpoint {endpoint:?}: {e}")))?;
    url.query_pairs_mut()
        .append_pair("search_query", query)
        .append_pair("sortBy", "submittedDate")
        .append_pair("sortOrder", "descending")
        .append_pair("max_results", &max_results.to_string());
    Ok(url)
}
