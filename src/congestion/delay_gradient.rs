//! An implementation of a delay-gradient congestion controller.
//!
//! 一个基于延迟梯度的拥塞控制器的实现。
//!
//! Each ack runs the delay sampler, the trend analyzer and the window policy
//! in that order. The policy's output is the only thing that moves the window.

use super::policy::{WindowPolicy, WindowState};
use super::sample::AckEvent;
use super::trend::TrendAnalyzer;
use super::{CongestionControl, WindowDecision};
use crate::clock::{Clock, MonotonicClock};
use crate::config::Config;
use crate::error::Result;
use tracing::debug;

/// A delay-gradient congestion controller.
///
/// 一个延迟梯度拥塞控制器。
#[derive(Debug)]
pub struct DelayGradientController<C = MonotonicClock> {
    state: WindowState,

    analyzer: TrendAnalyzer,

    policy: WindowPolicy,

    /// Diagnostic counters, never read by the control law.
    acks_processed: u64,
    datagrams_sent: u64,
    last_sent_sequence: Option<u64>,
    timeouts: u64,

    config: Config,

    /// Stamps verbose diagnostics only.
    clock: C,
}

impl DelayGradientController<MonotonicClock> {
    /// Creates a controller that stamps diagnostics with a monotonic clock.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> DelayGradientController<C> {
    /// Creates a controller with a custom diagnostic clock.
    ///
    /// Fails if the configuration is malformed.
    pub fn with_clock(config: Config, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config, clock))
    }

    fn from_validated(config: Config, clock: C) -> Self {
        Self {
            state: WindowState::new(config.window.initial_window),
            analyzer: TrendAnalyzer::new(config.delay.prediction_steps),
            policy: WindowPolicy::new(&config),
            acks_processed: 0,
            datagrams_sent: 0,
            last_sent_sequence: None,
            timeouts: 0,
            config,
            clock,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The raw, fractional window.
    pub fn window(&self) -> f64 {
        self.state.window
    }

    pub fn ticks_since_last_decrease(&self) -> u64 {
        self.state.ticks_since_last_decrease
    }

    pub fn trend_analyzer(&self) -> &TrendAnalyzer {
        &self.analyzer
    }

    pub fn algorithm_name(&self) -> &'static str {
        "delay-gradient"
    }

    /// Restores the state the controller was created with.
    pub fn reset(&mut self) {
        self.state = WindowState::new(self.config.window.initial_window);
        self.analyzer.reset();
        self.acks_processed = 0;
        self.datagrams_sent = 0;
        self.last_sent_sequence = None;
        self.timeouts = 0;

        debug!("Delay-gradient controller reset to initial state");
    }

    pub fn statistics(&self) -> ControllerStats {
        ControllerStats {
            window: self.state.window,
            window_size: self.state.window_size(),
            last_delay_ms: self.analyzer.last_sample().map(|s| s.delay_ms),
            last_velocity: self.analyzer.last_velocity(),
            ticks_since_last_decrease: self.state.ticks_since_last_decrease,
            acks_processed: self.acks_processed,
            datagrams_sent: self.datagrams_sent,
            last_sent_sequence: self.last_sent_sequence,
            timeouts: self.timeouts,
        }
    }
}

impl<C: Clock> CongestionControl for DelayGradientController<C> {
    fn window_size(&self) -> u32 {
        let size = self.state.window_size();
        if self.config.verbose_diagnostics {
            debug!(time_ms = self.clock.now_ms(), cwnd = size, "Window size queried");
        }
        size
    }

    fn on_sent(&mut self, sequence_number: u64, send_ms: u64) {
        self.datagrams_sent += 1;
        self.last_sent_sequence = Some(sequence_number);

        if self.config.verbose_diagnostics {
            debug!(
                time_ms = self.clock.now_ms(),
                seq = sequence_number,
                send_ms,
                "Datagram sent"
            );
        }
    }

    fn on_ack_received(&mut self, ack: AckEvent) -> WindowDecision {
        let sample = ack.delay_sample();
        let trend = self.analyzer.observe(sample);
        let decision = self.policy.on_ack(&mut self.state, &trend);
        self.acks_processed += 1;

        if self.config.verbose_diagnostics {
            debug!(
                time_ms = self.clock.now_ms(),
                seq = ack.sequence_number,
                send_ms = ack.send_ms,
                receiver_ms = ack.receiver_ms,
                ack_ms = ack.ack_receipt_ms,
                delay_ms = sample.delay_ms,
                cwnd = decision.window,
                action = ?decision.action,
                "Ack received"
            );
        }
        decision
    }

    fn on_timeout(&mut self) -> WindowDecision {
        self.timeouts += 1;
        self.policy.on_timeout(&mut self.state)
    }

    fn retransmission_timeout_ms(&self) -> u64 {
        self.config.timeout.fixed_timeout_ms
    }
}

impl Default for DelayGradientController<MonotonicClock> {
    fn default() -> Self {
        Self::from_validated(Config::default(), MonotonicClock::new())
    }
}

/// Delay-gradient controller statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerStats {
    pub window: f64,
    pub window_size: u32,
    pub last_delay_ms: Option<f64>,
    pub last_velocity: f64,
    pub ticks_since_last_decrease: u64,
    pub acks_processed: u64,
    pub datagrams_sent: u64,
    pub last_sent_sequence: Option<u64>,
    pub timeouts: u64,
}

impl std::fmt::Display for ControllerStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DelayGradient[cwnd:{:.3}, ticks:{}, last_delay:",
            self.window, self.ticks_since_last_decrease
        )?;
        match self.last_delay_ms {
            Some(delay) => write!(f, "{delay:.1}ms")?,
            None => write!(f, "none")?,
        }
        write!(
            f,
            ", velocity:{:.3}, acks:{}, sent:{}, timeouts:{}]",
            self.last_velocity, self.acks_processed, self.datagrams_sent, self.timeouts
        )
    }
}
