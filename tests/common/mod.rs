//! tests/common/mod.rs
#![allow(dead_code)]

use delay_window::config::Config;
use delay_window::congestion::{AckEvent, CongestionControl, DelayGradientController};
use std::sync::Once;

/// Initializes tracing for tests, ensuring it's only done once.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        let filter =
            std::env::var("RUST_LOG").unwrap_or_else(|_| "delay_window=info".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// Feeds acks spaced 10ms apart at send time and returns the integer window
/// after each one.
pub fn window_trajectory(config: Config, delays: &[u64]) -> Vec<u32> {
    let mut controller = DelayGradientController::new(config).unwrap();
    delays
        .iter()
        .enumerate()
        .map(|(i, &delay)| {
            let send_ms = i as u64 * 10;
            controller.on_sent(i as u64, send_ms);
            controller.on_ack_received(AckEvent::new(
                i as u64,
                send_ms,
                send_ms + delay / 2,
                send_ms + delay,
            ));
            controller.window_size()
        })
        .collect()
}
