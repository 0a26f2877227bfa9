#![deny(clippy::expect_used, clippy::unwrap_used)]

//! A delay-gradient congestion-window controller for datagram transports.
//!
//! The controller is driven by an external send/receive loop: it is asked how
//! many datagrams may be in flight, told when a datagram leaves, and fed every
//! acknowledgment. Each ack runs the delay sampler, the trend analyzer and the
//! window policy in that order.

pub mod clock;
pub mod config;
pub mod error;
pub mod sim;

pub mod congestion;
