//! Defines all possible error types in the library.

use thiserror::Error;

/// The primary error type for the congestion-window controller.
///
/// Every variant describes a malformed [`Config`](crate::config::Config).
/// Runtime operations on a constructed controller never fail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The window floor must allow at least one datagram in flight.
    #[error("minimum window must be at least 1 datagram, got {0}")]
    InvalidMinWindow(u32),

    /// The starting window would violate the floor invariant.
    #[error("initial window {initial} is below the minimum window {min}")]
    InitialWindowBelowMinimum { initial: u32, min: u32 },

    /// The delay thresholds are not ordered `min < max` with the decrease
    /// threshold between them.
    #[error(
        "delay thresholds must satisfy min ({min_ms}ms) <= decrease ({decrease_ms}ms) <= max ({max_ms}ms) with min < max"
    )]
    InvalidDelayThresholds {
        min_ms: u64,
        decrease_ms: u64,
        max_ms: u64,
    },

    /// A numeric tunable is out of its accepted range.
    #[error("invalid value for `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: String },
}

/// A specialized `Result` type for this library.
pub type Result<T> = std::result::Result<T, Error>;
