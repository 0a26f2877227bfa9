//! Drives the controller through its public surface only.

mod common;

use common::{init_tracing, window_trajectory};
use delay_window::config::{Config, TimeoutPolicy};
use delay_window::congestion::{AckEvent, CongestionControl, DelayGradientController};
use delay_window::error::Error;

#[test]
fn test_malformed_config_is_rejected_at_construction() {
    init_tracing();

    let mut config = Config::default();
    config.window.initial_window = 2;
    let err = DelayGradientController::new(config).unwrap_err();
    assert_eq!(err, Error::InitialWindowBelowMinimum { initial: 2, min: 6 });
    assert_eq!(
        err.to_string(),
        "initial window 2 is below the minimum window 6"
    );
}

#[test]
fn test_independent_instances_do_not_share_state() {
    init_tracing();

    let mut tight = Config::default();
    tight.delay.min_delay_threshold_ms = 20;
    tight.delay.decrease_delay_threshold_ms = 30;
    tight.delay.max_delay_threshold_ms = 40;

    let delays = vec![35; 40];
    let relaxed = window_trajectory(Config::default(), &delays);
    let constrained = window_trajectory(tight, &delays);

    // 35ms is comfortable for the defaults but between thresholds for the
    // tight instance.
    assert!(relaxed.last() > relaxed.first());
    assert!(constrained.iter().all(|&w| w == 80));
}

#[test]
fn test_trajectories_are_reproducible() {
    init_tracing();

    let delays: Vec<u64> = (0..500).map(|i| 20 + (i * i % 230)).collect();
    assert_eq!(
        window_trajectory(Config::default(), &delays),
        window_trajectory(Config::default(), &delays)
    );
}

#[test]
fn test_sustained_congestion_settles_on_the_floor() {
    init_tracing();

    let config = Config::default();
    let min_window = config.window.min_window;
    let trajectory = window_trajectory(config, &[400; 200]);

    assert!(trajectory.iter().all(|&w| w >= min_window));
    assert_eq!(trajectory.last(), Some(&min_window));
}

#[test]
fn test_timeout_policy_is_a_runtime_switch() {
    init_tracing();

    let mut held: DelayGradientController = DelayGradientController::default();
    let mut config = Config::default();
    config.timeout.policy = TimeoutPolicy::MultiplicativeDecrease;
    let mut shrinking = DelayGradientController::new(config).unwrap();

    for _ in 0..10 {
        held.on_timeout();
        shrinking.on_timeout();
    }

    assert_eq!(held.window_size(), 80);
    // 80 -> 48 -> 28.8 -> 17.28 -> 10.368 -> 6.2208, then below 6 / 0.6.
    assert_eq!(shrinking.window_size(), 6);
}

#[test]
fn test_ack_sequence_numbers_are_not_interpreted() {
    init_tracing();

    let mut ordered: DelayGradientController = DelayGradientController::default();
    let mut shuffled: DelayGradientController = DelayGradientController::default();

    for i in 0..20u64 {
        let send_ms = i * 10;
        ordered.on_ack_received(AckEvent::new(i, send_ms, send_ms + 20, send_ms + 45));
        shuffled.on_ack_received(AckEvent::new(1_000 - i, send_ms, send_ms + 20, send_ms + 45));
    }

    assert_eq!(ordered.window().to_bits(), shuffled.window().to_bits());
}
