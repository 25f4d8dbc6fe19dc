//! Crate-wide error type.
//!
//! ## Rust concepts
//! - `thiserror` derives `Display` and `std::error::Error` from attributes
//! - `#[from]` generates `From` impls so `?` converts library errors for us

/// Everything that can stop the monitor.
///
/// Only `Interrupted` is an expected exit: it unwinds the nested poll and
/// animation loops through `?` and `Monitor::run` turns it back into `Ok`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("status request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("status response has no `{0}` object")]
    MissingObject(String),

    #[error("LED driver error: {0}")]
    Driver(String),

    #[error("could not install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("interrupted")]
    Interrupted,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
