//! End-to-end runs of the controller inside the simulated driving loop.

mod common;

use common::init_tracing;
use delay_window::config::{Config, TimeoutPolicy};
use delay_window::congestion::{CongestionControl, DelayGradientController};
use delay_window::sim::{LinkModel, Simulation};

#[test]
fn test_uncongested_link_opens_the_window() {
    init_tracing();

    let link = LinkModel {
        one_way_delay_ms: 20,
        service_interval_ms: 0,
        jitter_ms: 0,
        loss_probability: 0.0,
    };
    let mut controller: DelayGradientController = DelayGradientController::default();
    let report = Simulation::new(link, 1).run(&mut controller, 2_000);

    assert_eq!(report.timed_out, 0);
    assert_eq!(report.max_delay_ms, 40);
    assert_eq!(report.mean_delay_ms, 40.0);
    assert!(report.acked > 0);
    assert!(report.acked <= report.sent);
    assert!(controller.window_size() > 80);
    assert_eq!(report.min_window(), Some(80));
}

#[test]
fn test_slow_bottleneck_pulls_the_window_down() {
    init_tracing();

    let link = LinkModel {
        one_way_delay_ms: 10,
        service_interval_ms: 5,
        jitter_ms: 0,
        loss_probability: 0.0,
    };
    let mut controller: DelayGradientController = DelayGradientController::default();
    let report = Simulation::new(link, 2).run(&mut controller, 5_000);

    // The initial flight of 80 queues for 400ms.
    assert!(report.max_delay_ms > 125);
    assert!(report.timed_out > 0);
    assert!(report.late_acks > 0);
    assert!(controller.window_size() < 80);
    assert!(report.min_window().unwrap_or(0) >= 6);
}

#[test]
fn test_lossy_link_reports_timeouts() {
    init_tracing();

    let link = LinkModel {
        one_way_delay_ms: 15,
        service_interval_ms: 1,
        jitter_ms: 10,
        loss_probability: 0.2,
    };
    let mut config = Config::default();
    config.timeout.policy = TimeoutPolicy::MultiplicativeDecrease;
    let mut controller = DelayGradientController::new(config).unwrap();
    let report = Simulation::new(link, 3).run(&mut controller, 3_000);

    assert!(report.timed_out > 0);
    assert!(report.acked + report.timed_out <= report.sent);
    assert_eq!(controller.statistics().timeouts, report.timed_out);
    assert_eq!(controller.statistics().datagrams_sent, report.sent);
    assert!(report.min_window().unwrap_or(0) >= 6);
}

#[test]
fn test_same_seed_same_run() {
    init_tracing();

    let link = LinkModel {
        jitter_ms: 25,
        loss_probability: 0.05,
        ..LinkModel::default()
    };

    let mut first: DelayGradientController = DelayGradientController::default();
    let mut second: DelayGradientController = DelayGradientController::default();
    let a = Simulation::new(link.clone(), 42).run(&mut first, 2_000);
    let b = Simulation::new(link, 42).run(&mut second, 2_000);

    assert_eq!(a, b);
    assert_eq!(first.window().to_bits(), second.window().to_bits());
}
