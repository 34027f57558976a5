//! The filter and normalization steps between the raw feed and the report.
//!
//! Everything here is a pure transformation over a fetched sequence, in a
//! fixed order: date filter, summary cleanup, re-validation against the
//! originating criteria, projection onto display columns.

use chrono::NaiveDate;

use crate::{
    config::Criteria,
    record::{PaperRecord, ResultKind, ResultSet},
};

/// Maximum summary length before the ellipsis.
const SUMMARY_LIMIT: usize = 300;

/// Extract the calendar date from a feed timestamp, dropping time-of-day.
pub fn published_date(published: &str) -> Option<NaiveDate> {
    let date = published.split('T').next().unwrap_or(published);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Flatten line breaks and trim the summary for tabular display.
///
/// The ellipsis is appended even when the text is already within the limit.
pub fn clean_summary(summary: &str) -> String {
    let flat = summary.replace('\n', " ");
    let mut cleaned: String = flat.chars().take(SUMMARY_LIMIT).collect();
    cleaned.push_str("...");
    cleaned
}

/// Does the record genuinely satisfy the kind's own filter?
///
/// The search API matches loosely (tokenization, stemming); any record whose
/// designated field contains none of the configured terms is dropped here.
pub fn matches(kind: ResultKind, record: &PaperRecord, criteria: &Criteria) -> bool {
    let field = kind.field(record);
    kind.terms(criteria).iter().any(|term| field.contains(term.as_str()))
}

/// Run one fetched sequence through the full pipeline for its kind.
///
/// Deterministic: the same input always produces the same result set.
pub fn process(
    records: &[PaperRecord],
    kind: ResultKind,
    criteria: &Criteria,
    target: NaiveDate,
) -> ResultSet {
    let rows = records
        .iter()
        .filter(|r| published_date(&r.published) == Some(target))
        .map(|r| PaperRecord {
            summary: clean_summary(&r.summary),
            ..r.clone()
        })
        .filter(|r| matches(kind, r, criteria))
        .map(|r| kind.project(&r))
        .collect();
    ResultSet { kind, rows }
}
