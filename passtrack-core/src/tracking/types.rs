use chrono::NaiveDate;
use serde::Serialize;

/// Outcome of a tracking lookup
///
/// Serializes to the same mapping the portal scraper has always produced:
/// `{"Status": ...}` for alerts, `{"Expected Date": ..., "Status": ...}` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatusReport {
    /// The portal answered with a danger alert (unknown reference, closed application, ...)
    Alert {
        #[serde(rename = "Status")]
        status: String,
    },
    /// The portal rendered the status table
    Tracked {
        /// Date the portal expects the passport to be issued, if shown
        #[serde(rename = "Expected Date")]
        expected_date: Option<NaiveDate>,
        /// Heading and sub-status joined as `"heading: sub-status"`
        #[serde(rename = "Status")]
        status: Option<String>,
    },
}

impl StatusReport {
    pub fn status(&self) -> Option<&str> {
        match self {
            StatusReport::Alert { status } => Some(status),
            StatusReport::Tracked { status, .. } => status.as_deref(),
        }
    }

    pub fn expected_date(&self) -> Option<NaiveDate> {
        match self {
            StatusReport::Alert { .. } => None,
            StatusReport::Tracked { expected_date, .. } => *expected_date,
        }
    }
}

/// Raw HTTP answer from the portal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalPage {
    pub status: u16,
    pub body: String,
}

impl PortalPage {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The portal only ever signals success with a plain 200.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Form submitted to the search endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub token: String,
    pub reference: String,
}

impl SearchForm {
    pub const REFERENCE_FIELD: &'static str = "search[Criteria][ReferenceNumber]";

    pub fn new(token: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            reference: reference.into(),
        }
    }

    /// Form-encoded field pairs, token first.
    pub fn fields(&self) -> [(&'static str, &str); 2] {
        [
            (super::markup::TOKEN_IDENTIFIER, self.token.as_str()),
            (Self::REFERENCE_FIELD, self.reference.as_str()),
        ]
    }
}
