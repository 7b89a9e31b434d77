use std::time::Duration;

use scraper::Html;
use tracing::{debug, error, info, instrument};

use super::markup::{self, TOKEN_IDENTIFIER};
use super::transport::{HttpSession, PortalTransport};
use super::types::{SearchForm, StatusReport};
use crate::error::{Result, TrackerError};
use crate::validation::normalize_reference;

pub const LANDING_URL: &str = "https://passporttracking.dfa.ie/PassportTracking/";
pub const SEARCH_URL: &str = "https://passporttracking.dfa.ie/PassportTracking/Home/GetStep";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("passtrack/", env!("CARGO_PKG_VERSION"));

/// Client for looking up passport applications on the DFA tracking portal
#[derive(Debug, Clone)]
pub struct TrackingClient {
    timeout: Duration,
    user_agent: String,
}

impl Default for TrackingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingClient {
    /// Create a new TrackingClient with default settings
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set the timeout for each of the two portal requests
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Look up the status of an application
    ///
    /// Every call runs in a fresh HTTP session, so concurrent lookups on the
    /// same client never share cookies or tokens.
    #[instrument(skip(self), fields(reference = %reference))]
    pub async fn lookup(&self, reference: &str) -> Result<StatusReport> {
        let session = HttpSession::new(self.timeout, &self.user_agent)?;
        self.lookup_with(&session, reference).await
    }

    /// Run the two-step lookup over the given transport
    pub async fn lookup_with<T: PortalTransport>(
        &self,
        transport: &T,
        reference: &str,
    ) -> Result<StatusReport> {
        let reference = normalize_reference(reference)?;

        let token = fetch_token(transport).await?;
        let form = SearchForm::new(token, reference);
        let body = submit_search(transport, &form).await?;

        Ok(read_report(&body))
    }
}

/// Step one: load the landing page and pull out the anti-forgery token
async fn fetch_token<T: PortalTransport>(transport: &T) -> Result<String> {
    info!("Sending GET request to {}", LANDING_URL);
    let page = transport.get(LANDING_URL).await?;

    if !page.is_ok() {
        error!(
            "Status code {} returned when requesting {}",
            page.status, LANDING_URL
        );
        return Err(TrackerError::UnexpectedStatus {
            url: LANDING_URL.to_string(),
            status: page.status,
        });
    }

    debug!("Parsing response content to document");
    let document = Html::parse_document(&page.body);
    markup::extract_token(&document).ok_or_else(|| {
        error!(
            "Could not find {} in response from {}",
            TOKEN_IDENTIFIER, LANDING_URL
        );
        error!("Cannot proceed with step-two as request token has not been set");
        TrackerError::TokenNotFound {
            identifier: TOKEN_IDENTIFIER.to_string(),
            url: LANDING_URL.to_string(),
        }
    })
}

/// Step two: submit the search form and return the status document's HTML
async fn submit_search<T: PortalTransport>(transport: &T, form: &SearchForm) -> Result<String> {
    info!("Sending POST request to {}", SEARCH_URL);
    let page = transport.post_form(SEARCH_URL, form).await?;

    if !page.is_ok() {
        error!(
            "Status code {} returned when requesting {}",
            page.status, SEARCH_URL
        );
        return Err(TrackerError::UnexpectedStatus {
            url: SEARCH_URL.to_string(),
            status: page.status,
        });
    }

    Ok(page.body)
}

/// Turn the status document into a report; a danger alert wins over the table
fn read_report(body: &str) -> StatusReport {
    debug!("Parsing response content to document");
    let document = Html::parse_document(body);

    if let Some(status) = markup::extract_alert(&document) {
        return StatusReport::Alert { status };
    }

    StatusReport::Tracked {
        expected_date: markup::extract_expected_date(&document),
        status: markup::extract_status(&document),
    }
}
