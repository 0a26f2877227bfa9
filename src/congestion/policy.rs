//! 窗口控制律
//! Window control law
//!
//! 职责：
//! - 根据当前延迟、趋势和预测决定窗口的增长、收缩或保持
//! - 维护窗口下限和收缩冷却计数
//!
//! Every ack is evaluated in a fixed order: optional AIMD pre-adjustment,
//! increase-factor damping, the three-way delay threshold rule, the optional
//! delta-delay rule, the non-finite guard, the floor clamp, and finally the
//! cooldown counter.

use super::trend::Trend;
use super::{WindowAction, WindowDecision};
use crate::config::{Config, DelayConfig, ModeConfig, TimeoutPolicy, WindowConfig};
use tracing::{debug, trace, warn};

/// The mutable part of the controller the policy acts on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowState {
    /// Congestion window in datagrams, kept fractional between updates.
    pub window: f64,
    /// Acks processed since the last multiplicative decrease.
    pub ticks_since_last_decrease: u64,
}

impl WindowState {
    pub fn new(initial_window: u32) -> Self {
        Self {
            window: initial_window as f64,
            ticks_since_last_decrease: 0,
        }
    }

    /// The window as a whole number of datagrams.
    pub fn window_size(&self) -> u32 {
        self.window as u32
    }
}

/// The delay-gradient window policy.
#[derive(Debug, Clone)]
pub struct WindowPolicy {
    window: WindowConfig,
    delay: DelayConfig,
    modes: ModeConfig,
    timeout_policy: TimeoutPolicy,
}

impl WindowPolicy {
    pub fn new(config: &Config) -> Self {
        Self {
            window: config.window.clone(),
            delay: config.delay.clone(),
            modes: config.modes.clone(),
            timeout_policy: config.timeout.policy,
        }
    }

    fn min_window(&self) -> f64 {
        self.window.min_window as f64
    }

    /// Applies the control law for one ack.
    pub fn on_ack(&self, state: &mut WindowState, trend: &Trend) -> WindowDecision {
        let before = *state;

        if self.modes.use_aimd_mode {
            state.window += self.window.additive_increase / state.window;
            trace!(cwnd = state.window, "AIMD pre-adjustment");
        }

        let increase_factor = self.increase_factor(trend);

        let action = if self.modes.use_delay_threshold_mode {
            self.apply_thresholds(state, trend, increase_factor)
        } else {
            WindowAction::Hold
        };

        if self.modes.use_delta_delay_mode {
            self.apply_delta_delay(state, trend);
        }

        if !state.window.is_finite() {
            warn!(
                cwnd = state.window,
                restored = before.window,
                delay_ms = trend.delay_ms(),
                "Non-finite window, holding previous value"
            );
            state.window = before.window;
        }

        let clamped = self.clamp(state);
        state.ticks_since_last_decrease += 1;

        WindowDecision {
            window: state.window,
            action,
            clamped,
            significant_change: before.window_size() != state.window_size(),
        }
    }

    /// Applies the configured timeout reaction.
    pub fn on_timeout(&self, state: &mut WindowState) -> WindowDecision {
        let before = *state;
        let mut action = WindowAction::Hold;

        match self.timeout_policy {
            TimeoutPolicy::Hold => {
                trace!(cwnd = state.window, "Timeout ignored by policy");
            }
            TimeoutPolicy::MultiplicativeDecrease => {
                if state.window > self.min_window() / self.window.decrease_factor {
                    state.window *= self.window.decrease_factor;
                    action = WindowAction::Shrink;
                    debug!(
                        old_cwnd = before.window,
                        new_cwnd = state.window,
                        "Timeout: multiplicative decrease"
                    );
                }
            }
        }

        let clamped = self.clamp(state);
        WindowDecision {
            window: state.window,
            action,
            clamped,
            significant_change: before.window_size() != state.window_size(),
        }
    }

    /// Base increase factor, damped when delay is jumping or predicted to
    /// cross the congestion ceiling.
    fn increase_factor(&self, trend: &Trend) -> f64 {
        let base = self.window.additive_increase;
        let Some(previous) = trend.previous else {
            return base;
        };
        let delay = trend.delay_ms();
        if delay <= 0.0 {
            return base;
        }

        let rising = trend.diff_ms > self.delay.diff_epsilon_ms;
        let heading_over = trend.prediction_ms > self.delay.max_delay_threshold_ms as f64;
        if !(rising || heading_over) {
            return base;
        }

        let damped = base * ((previous.delay_ms / delay).max(0.0) * self.delay.damping_ratio);
        trace!(
            increase_factor = damped,
            diff_ms = trend.diff_ms,
            prediction_ms = trend.prediction_ms,
            "Increase factor damped"
        );
        damped
    }

    fn apply_thresholds(
        &self,
        state: &mut WindowState,
        trend: &Trend,
        increase_factor: f64,
    ) -> WindowAction {
        let delay = trend.delay_ms();
        let min_delay = self.delay.min_delay_threshold_ms as f64;
        let max_delay = self.delay.max_delay_threshold_ms as f64;
        let decrease_delay = self.delay.decrease_delay_threshold_ms as f64;
        let min_window = self.min_window();

        if delay <= 0.0 {
            debug!(
                delay_ms = delay,
                cwnd = state.window,
                "Non-positive delay sample, holding window"
            );
            return WindowAction::Hold;
        }

        if delay < min_delay && trend.prediction_ms < max_delay {
            state.window += (min_delay / delay) * increase_factor / state.window;
            trace!(cwnd = state.window, delay_ms = delay, "Delay below target: growing window");
            WindowAction::Grow
        } else if delay > max_delay
            && state.window > min_window
            && state.ticks_since_last_decrease > self.window.min_window as u64
        {
            let old = state.window;
            state.window *= self.window.decrease_factor * (max_delay / delay);
            state.ticks_since_last_decrease = 0;
            debug!(
                old_cwnd = old,
                new_cwnd = state.window,
                delay_ms = delay,
                "Delay above ceiling: multiplicative decrease"
            );
            WindowAction::Shrink
        } else if delay > decrease_delay
            && trend.velocity > 0.0
            && trend.acceleration > 0.0
            && state.window > min_window
        {
            state.window -=
                (delay / max_delay) * increase_factor / state.window * self.delay.trim_gain;
            trace!(
                cwnd = state.window,
                delay_ms = delay,
                velocity = trend.velocity,
                acceleration = trend.acceleration,
                "Delay accelerating upward: trimming window"
            );
            WindowAction::Trim
        } else {
            trace!(cwnd = state.window, delay_ms = delay, "Window stable");
            WindowAction::Hold
        }
    }

    fn apply_delta_delay(&self, state: &mut WindowState, trend: &Trend) {
        let Some(previous) = trend.previous.filter(|p| p.is_positive()) else {
            return;
        };
        if trend.diff_ms > 0.0 {
            state.window *= trend.diff_ms / previous.delay_ms;
        } else {
            state.window += -trend.diff_ms / state.window;
        }
        trace!(cwnd = state.window, diff_ms = trend.diff_ms, "Delta-delay adjustment");
    }

    fn clamp(&self, state: &mut WindowState) -> bool {
        if state.window < self.min_window() {
            state.window = self.min_window();
            true
        } else {
            false
        }
    }
}
