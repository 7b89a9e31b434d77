//! Everything that knows what the tracking portal's HTML looks like.
//!
//! When the portal changes its markup, this is the only file that should need
//! to change.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error, info, warn};

/// Name of the hidden form input carrying the anti-forgery token
pub const TOKEN_IDENTIFIER: &str = "__RequestVerificationToken";

/// Format of the expected issue date, e.g. `14/11/2026`
pub const DATE_FORMAT: &str = "%d/%m/%Y";

const ALERT_CLASS: &str = "alert alert-danger";
const STATUS_TABLE_CLASS: &str = "table";
const DATE_CLASS: &str = "status-date";

static TOKEN_INPUT: Lazy<Selector> =
    Lazy::new(|| selector("input[name=\"__RequestVerificationToken\"]"));
static ALERT_DIV: Lazy<Selector> = Lazy::new(|| selector("div.alert.alert-danger"));
static STATUS_TABLE: Lazy<Selector> = Lazy::new(|| selector("table.table"));
static HEADING: Lazy<Selector> = Lazy::new(|| selector("h2"));
static SUB_STATUS: Lazy<Selector> = Lazy::new(|| selector("p"));
static DATE_DIV: Lazy<Selector> = Lazy::new(|| selector("div.status-date"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

/// Concatenated, trimmed text content of an element
fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Find the anti-forgery token on the landing page
pub fn extract_token(document: &Html) -> Option<String> {
    info!("Attempting to find {} in document", TOKEN_IDENTIFIER);

    let Some(input) = document.select(&TOKEN_INPUT).next() else {
        error!("Could not find {} input in document", TOKEN_IDENTIFIER);
        return None;
    };

    match input.value().attr("value") {
        Some(token) => {
            info!("Successfully located request token in response");
            Some(token.to_string())
        }
        None => {
            error!("{} input has no value attribute", TOKEN_IDENTIFIER);
            None
        }
    }
}

/// Text of the danger alert, if the portal rendered one
pub fn extract_alert(document: &Html) -> Option<String> {
    let alert = document.select(&ALERT_DIV).next()?;
    let text = text_of(alert);
    debug!(alert = %text, "Found {} div", ALERT_CLASS);
    Some(text)
}

/// Headings and paragraphs an HTML5 parser moved out of a table
///
/// Stray `<h2>`/`<p>` placed directly inside `<table>` are foster-parented to
/// just before it, so they are the table's contiguous preceding siblings.
fn fostered_before(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut moved = Vec::new();
    for node in table.prev_siblings() {
        if let Some(text) = node.value().as_text() {
            if text.trim().is_empty() {
                continue;
            }
            break;
        }
        match ElementRef::wrap(node) {
            Some(element) if matches!(element.value().name(), "h2" | "p") => moved.push(element),
            _ => break,
        }
    }
    moved.reverse();
    moved
}

/// Current status from the status table
///
/// Returns `"heading: sub-status"` when both are present, the bare heading
/// when the sub-status is missing, and `None` when there is no table or no
/// heading.
pub fn extract_status(document: &Html) -> Option<String> {
    info!("Attempting to find {} table in document", STATUS_TABLE_CLASS);

    let Some(table) = document.select(&STATUS_TABLE).next() else {
        error!("Could not find {} table in status document", STATUS_TABLE_CLASS);
        return None;
    };

    let (heading, sub_status) = match table.select(&HEADING).next() {
        Some(heading) => (Some(heading), table.select(&SUB_STATUS).next()),
        None => {
            let moved = fostered_before(table);
            let first = |name: &str| moved.iter().copied().find(|e| e.value().name() == name);
            (first("h2"), first("p"))
        }
    };

    let Some(heading) = heading else {
        error!("Could not find status tag in status document");
        return None;
    };
    let heading = text_of(heading);

    match sub_status {
        Some(sub_status) => Some(format!("{}: {}", heading, text_of(sub_status))),
        None => {
            warn!("Could not find sub-status tag in status document");
            Some(heading)
        }
    }
}

/// Expected issue date from the `status-date` div
pub fn extract_expected_date(document: &Html) -> Option<NaiveDate> {
    info!("Attempting to find {} in document", DATE_CLASS);

    let Some(div) = document.select(&DATE_DIV).next() else {
        debug!("No {} div in status document", DATE_CLASS);
        return None;
    };

    let date_str = text_of(div);
    debug!("Parsing {} as {}", date_str, DATE_FORMAT);
    match NaiveDate::parse_from_str(&date_str, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            warn!(date = %date_str, error = %e, "Could not parse expected date");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_table(inner: &str) -> Html {
        Html::parse_document(&format!(
            "<html><body><table class=\"table\"><tr><td>{}</td></tr></table></body></html>",
            inner
        ))
    }

    #[test]
    fn test_extract_token() {
        let doc = Html::parse_document(
            r#"<form><input name="__RequestVerificationToken" type="hidden" value="tok1" /></form>"#,
        );
        assert_eq!(extract_token(&doc).as_deref(), Some("tok1"));
    }

    #[test]
    fn test_extract_token_ignores_other_inputs() {
        let doc = Html::parse_document(
            r#"<input name="other" value="nope"><input name="__RequestVerificationToken" value="tok2">"#,
        );
        assert_eq!(extract_token(&doc).as_deref(), Some("tok2"));
    }

    #[test]
    fn test_extract_token_missing_input() {
        let doc = Html::parse_document("<html><body><p>Maintenance</p></body></html>");
        assert_eq!(extract_token(&doc), None);
    }

    #[test]
    fn test_extract_token_missing_value() {
        let doc = Html::parse_document(r#"<input name="__RequestVerificationToken">"#);
        assert_eq!(extract_token(&doc), None);
    }

    #[test]
    fn test_extract_alert_trims_text() {
        let doc = Html::parse_document(r#"<div class="alert alert-danger">  Foo
            </div>"#);
        assert_eq!(extract_alert(&doc).as_deref(), Some("Foo"));
    }

    #[test]
    fn test_info_alert_is_not_danger() {
        let doc = Html::parse_document(r#"<div class="alert alert-info">Heads up</div>"#);
        assert_eq!(extract_alert(&doc), None);
    }

    #[test]
    fn test_status_heading_and_sub_status() {
        let doc = status_table("<h2> A </h2><p> B </p>");
        assert_eq!(extract_status(&doc).as_deref(), Some("A: B"));
    }

    #[test]
    fn test_status_heading_only() {
        let doc = status_table("<h2>A</h2>");
        assert_eq!(extract_status(&doc).as_deref(), Some("A"));
    }

    #[test]
    fn test_status_bare_table_heading_and_sub_status() {
        let doc = Html::parse_document(r#"<table class="table"><h2>A</h2><p>B</p></table>"#);
        assert_eq!(extract_status(&doc).as_deref(), Some("A: B"));
    }

    #[test]
    fn test_status_bare_table_heading_only() {
        let doc = Html::parse_document(r#"<table class="table"><h2>A</h2></table>"#);
        assert_eq!(extract_status(&doc).as_deref(), Some("A"));
    }

    #[test]
    fn test_status_bare_table_ignores_content_before_other_elements() {
        let doc = Html::parse_document(
            r#"<h2>Page title</h2><div>intro</div><table class="table"><p>B</p></table>"#,
        );
        assert_eq!(extract_status(&doc), None);
    }

    #[test]
    fn test_status_without_heading() {
        let doc = status_table("<p>B</p>");
        assert_eq!(extract_status(&doc), None);
    }

    #[test]
    fn test_status_without_table() {
        let doc = Html::parse_document("<h2>A</h2><p>B</p>");
        assert_eq!(extract_status(&doc), None);
    }

    #[test]
    fn test_status_uses_first_table_of_class() {
        let doc = Html::parse_document(
            "<table class=\"layout\"><tr><td><h2>Wrong</h2></td></tr></table>\
             <table class=\"table table-striped\"><tr><td><h2>Right</h2><p>Sub</p></td></tr></table>",
        );
        assert_eq!(extract_status(&doc).as_deref(), Some("Right: Sub"));
    }

    #[test]
    fn test_expected_date() {
        let doc = Html::parse_document(r#"<div class="status-date"> 14/11/2026 </div>"#);
        assert_eq!(
            extract_expected_date(&doc),
            NaiveDate::from_ymd_opt(2026, 11, 14)
        );
    }

    #[test]
    fn test_expected_date_unparseable() {
        let doc = Html::parse_document(r#"<div class="status-date">soon</div>"#);
        assert_eq!(extract_expected_date(&doc), None);
    }

    #[test]
    fn test_expected_date_missing() {
        let doc = Html::parse_document("<div>14/11/2026</div>");
        assert_eq!(extract_expected_date(&doc), None);
    }
}
