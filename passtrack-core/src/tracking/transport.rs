use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::types::{PortalPage, SearchForm};
use crate::error::{Result, TrackerError};

/// The two HTTP operations a tracking lookup needs.
///
/// Implementations carry the session state (cookies) between the calls of a
/// single lookup; non-200 answers are returned as pages, not errors.
pub trait PortalTransport {
    fn get(&self, url: &str) -> impl Future<Output = Result<PortalPage>> + Send;

    fn post_form(
        &self,
        url: &str,
        form: &SearchForm,
    ) -> impl Future<Output = Result<PortalPage>> + Send;
}

/// reqwest-backed session with its own cookie jar
///
/// Build one per lookup: cookies set by the landing page are replayed on the
/// search submission and never leak into another lookup.
#[derive(Debug, Clone)]
pub struct HttpSession {
    http: Client,
    timeout: Duration,
}

impl HttpSession {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .cookie_store(true)
            .build()?;

        Ok(Self { http, timeout })
    }

    fn map_send_error(&self, url: &str, error: reqwest::Error) -> TrackerError {
        if error.is_timeout() {
            TrackerError::Timeout(format!(
                "{} did not respond within {}s",
                url,
                self.timeout.as_secs()
            ))
        } else {
            TrackerError::HttpError(error)
        }
    }

    async fn read_page(&self, url: &str, response: reqwest::Response) -> Result<PortalPage> {
        let status = response.status().as_u16();
        let cookies = response.cookies().count();
        if cookies > 0 {
            debug!(cookies, "Updating cookie jar");
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_send_error(url, e))?;

        Ok(PortalPage { status, body })
    }
}

impl PortalTransport for HttpSession {
    async fn get(&self, url: &str) -> Result<PortalPage> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(url, e))?;

        self.read_page(url, response).await
    }

    async fn post_form(&self, url: &str, form: &SearchForm) -> Result<PortalPage> {
        let response = self
            .http
            .post(url)
            .form(&form.fields()[..])
            .send()
            .await
            .map_err(|e| self.map_send_error(url, e))?;

        self.read_page(url, response).await
    }
}
