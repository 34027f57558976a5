//! HTML rendering of the digest report.

use chrono::NaiveDate;

use crate::record::{ResultKind, ResultSet};

/// Render the full digest document.
///
/// Every kind gets its own section and table even when it holds no rows;
/// only a run with no rows anywhere collapses to a single notice.
/// Rendering cannot fail.
pub fn render(sets: &[ResultSet], target: NaiveDate) -> String {
    let mut html = String::new();
    html.push_str("<html>\n<body>\n");
    html.push_str(&format!("<h1>Arxiv Daily Digest for {target}</h1>\n"));
    if sets.iter().all(ResultSet::is_empty) {
        html.push_str("<h2>No new papers found.</h2>\n");
    } else {
        for set in sets {
            html.push_str(&format!("<h2>{}</h2>\n", section_title(set.kind)));
            render_table(&mut html, set);
        }
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn section_title(kind: ResultKind) -> &'static str {
    match kind {
        ResultKind::Author => "Papers by Author Search",
        ResultKind::Topic => "Papers by Topic Search",
        ResultKind::Category => "Papers by Category Search",
    }
}

fn render_table(html: &mut String, set: &ResultSet) {
    html.push_str("<table border=\"1\">\n<thead>\n<tr>");
    for column in set.kind.columns() {
        html.push_str("<th>");
        html.push_str(&escape(column));
        html.push_str("</th>");
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in &set.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str("<td>");
            html.push_str(&escape(cell));
            html.push_str("</td>");
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
}

/// Minimal HTML text escaping for headings and cells.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
