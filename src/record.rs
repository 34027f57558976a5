use std::fmt;

use crate::config::Criteria;

/// Normalized representation of one indexed paper.
///
/// Multi-valued fields (authors, categories) are kept in their rendered,
/// comma-joined form; every downstream consumer treats them as display
/// strings and matches on substrings. A record is never mutated after
/// parsing; the pipeline builds new values instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperRecord {
    pub title: String,
    pub authors: String,
    pub summary: String,
    pub categories: String,
    pub url: String,
    /// Raw ISO-8601 timestamp as returned by the feed.
    pub published: String,
}

/// The three independently filtered collections a digest is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Author,
    Topic,
    Category,
}

impl ResultKind {
    pub const ALL: [ResultKind; 3] = [ResultKind::Author, ResultKind::Topic, ResultKind::Category];

    /// arXiv search field prefix for this kind.
    pub fn field_prefix(self) -> &'static str {
        match self {
            ResultKind::Author => "au:",
            ResultKind::Topic => "ti:",
            ResultKind::Category => "cat:",
        }
    }

    /// The criteria terms this kind filters on.
    pub fn terms(self, criteria: &Criteria) -> &[String] {
        match self {
            ResultKind::Author => &criteria.authors,
            ResultKind::Topic => &criteria.topics,
            ResultKind::Category => &criteria.categories,
        }
    }

    /// The record field the terms are looked up in.
    pub fn field(self, record: &PaperRecord) -> &str {
        match self {
            ResultKind::Author => &record.authors,
            ResultKind::Topic => &record.title,
            ResultKind::Category => &record.categories,
        }
    }

    /// Column order of the rendered table for this kind.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            ResultKind::Author => &["author", "title", "summary", "category", "url"],
            ResultKind::Topic => &["title", "author", "summary", "category", "url"],
            ResultKind::Category => &["category", "title", "author", "summary", "url"],
        }
    }

    /// Project a record onto this kind's display columns, in order.
    pub fn project(self, record: &PaperRecord) -> Vec<String> {
        let r = record;
        match self {
            ResultKind::Author => vec![
                r.authors.clone(),
                r.title.clone(),
                r.summary.clone(),
                r.categories.clone(),
                r.url.clone(),
            ],
            ResultKind::Topic => vec![
                r.title.clone(),
                r.authors.clone(),
                r.summary.clone(),
                r.categories.clone(),
                r.url.clone(),
            ],
            ResultKind::Category => vec![
                r.categories.clone(),
                r.title.clone(),
                r.authors.clone(),
                r.summary.clone(),
                r.url.clone(),
            ],
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResultKind::Author => "author",
            ResultKind::Topic => "topic",
            ResultKind::Category => "category",
        };
        f.write_str(name)
    }
}

/// One kind's processed display rows, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    pub kind: ResultKind,
    pub rows: Vec<Vec<String>>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
