//! Passport application tracking
//!
//! Looks up an application on the DFA tracking portal in two steps:
//! - Load the landing page to pick up a session cookie and anti-forgery token
//! - Submit the reference number with that token and read the status page

mod client;
pub mod markup;
mod transport;
mod types;

pub use client::{TrackingClient, LANDING_URL, SEARCH_URL};
pub use transport::{HttpSession, PortalTransport};
pub use types::{PortalPage, SearchForm, StatusReport};
