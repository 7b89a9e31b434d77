pub mod colors;
pub mod error;
pub mod output;
pub mod tracking;
pub mod validation;

pub use error::{ErrorKind, Result, TrackerError};
pub use validation::normalize_reference;

pub use tracking::{
    HttpSession, PortalPage, PortalTransport, SearchForm, StatusReport, TrackingClient,
};

pub use output::{OutputFormat, OutputFormatter};
