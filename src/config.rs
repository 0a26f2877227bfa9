//! 定义了拥塞窗口控制器的可配置参数。
//! Defines configurable parameters for the congestion-window controller.

use crate::error::{Error, Result};

/// A structure containing all configurable parameters for a controller.
///
/// 包含控制器所有可配置参数的结构体。
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Window sizing parameters.
    /// 窗口大小相关参数。
    pub window: WindowConfig,

    /// Delay thresholds and trend tunables.
    /// 延迟阈值与趋势相关参数。
    pub delay: DelayConfig,

    /// Switches for the optional control laws.
    /// 可选控制律的开关。
    pub modes: ModeConfig,

    /// Retransmission timeout parameters.
    /// 重传超时相关参数。
    pub timeout: TimeoutConfig,

    /// Emit a diagnostic event, stamped with the controller's clock, on every
    /// query, send and ack.
    /// 在每次查询、发送和确认时输出带时钟时间戳的诊断事件。
    pub verbose_diagnostics: bool,
}

/// Window sizing parameters.
///
/// 窗口大小相关参数。
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    /// The initial congestion window size in datagrams.
    /// 初始拥塞窗口大小（以数据报为单位）。
    pub initial_window: u32,
    /// The minimum congestion window size in datagrams. The window is clamped
    /// to this floor after every update.
    /// 最小拥塞窗口大小（以数据报为单位）。每次更新后窗口都会被限制在此下限之上。
    pub min_window: u32,
    /// The base increase factor used by the growth, trim and AIMD rules.
    /// 增长、削减和AIMD规则使用的基础增长因子。
    pub additive_increase: f64,
    /// The multiplicative factor applied on a congestion shrink.
    /// 拥塞收缩时应用的乘性因子。
    pub decrease_factor: f64,
}

/// Delay thresholds and trend tunables.
///
/// 延迟阈值与趋势相关参数。
#[derive(Debug, Clone, PartialEq)]
pub struct DelayConfig {
    /// Delays above this are treated as sustained congestion.
    /// 高于此值的延迟被视为持续拥塞。
    pub max_delay_threshold_ms: u64,
    /// Delays above this, while rising and accelerating, trigger a pre-emptive trim.
    /// 高于此值且正在加速上升的延迟会触发预防性削减。
    pub decrease_delay_threshold_ms: u64,
    /// Delays below this mean the path is comfortably underloaded.
    /// 低于此值的延迟表示路径负载较轻。
    pub min_delay_threshold_ms: u64,
    /// A delay increase larger than this dampens growth for the round.
    /// 延迟增量超过此值时会抑制本轮增长。
    pub diff_epsilon_ms: f64,
    /// How many samples ahead the linear delay prediction looks.
    /// 线性延迟预测向前看的样本数。
    pub prediction_steps: f64,
    /// Scale applied to the old/new delay ratio when damping growth.
    /// 抑制增长时应用于新旧延迟比值的缩放系数。
    pub damping_ratio: f64,
    /// Gain of the pre-emptive trim rule.
    /// 预防性削减规则的增益。
    pub trim_gain: f64,
}

/// Switches for the optional control laws.
///
/// 可选控制律的开关。
#[derive(Debug, Clone, PartialEq)]
pub struct ModeConfig {
    /// Apply the three-way delay threshold rule.
    /// 启用三段式延迟阈值规则。
    pub use_delay_threshold_mode: bool,
    /// Add `additive_increase / window` on every ack before any other rule.
    /// 在其他规则之前，每个ACK都增加 `additive_increase / window`。
    pub use_aimd_mode: bool,
    /// Scale the window by the relative delay change after the threshold rule.
    /// 在阈值规则之后，按延迟的相对变化缩放窗口。
    pub use_delta_delay_mode: bool,
}

/// How the controller reacts to a retransmission timeout.
///
/// 控制器对重传超时的响应方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeoutPolicy {
    /// Leave the window untouched.
    /// 保持窗口不变。
    #[default]
    Hold,
    /// Multiply the window by `decrease_factor` while it stays above the floor.
    /// 在窗口高于下限时将其乘以 `decrease_factor`。
    MultiplicativeDecrease,
}

/// Retransmission timeout parameters.
///
/// 重传超时相关参数。
#[derive(Debug, Clone, PartialEq)]
pub struct TimeoutConfig {
    /// How long the driving loop should wait for an ack before declaring a
    /// datagram lost. Does not adapt to measured delay.
    /// 驱动循环在判定数据报丢失前等待ACK的时长。不随测量延迟变化。
    pub fixed_timeout_ms: u64,
    /// Reaction to a timeout event.
    /// 对超时事件的响应。
    pub policy: TimeoutPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            delay: DelayConfig::default(),
            modes: ModeConfig::default(),
            timeout: TimeoutConfig::default(),
            verbose_diagnostics: false,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            initial_window: 80,
            min_window: 6,
            additive_increase: 1.2,
            decrease_factor: 0.6,
        }
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            max_delay_threshold_ms: 125,
            decrease_delay_threshold_ms: 90,
            min_delay_threshold_ms: 60,
            diff_epsilon_ms: 3.0,
            prediction_steps: 5.0,
            damping_ratio: 0.75,
            trim_gain: 4.0,
        }
    }
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            use_delay_threshold_mode: true,
            use_aimd_mode: false,
            use_delta_delay_mode: false,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            fixed_timeout_ms: 125,
            policy: TimeoutPolicy::Hold,
        }
    }
}

impl Config {
    /// Checks the configuration for programmer errors.
    ///
    /// 检查配置中的编程错误。
    pub fn validate(&self) -> Result<()> {
        let window = &self.window;
        if window.min_window == 0 {
            return Err(Error::InvalidMinWindow(window.min_window));
        }
        if window.initial_window < window.min_window {
            return Err(Error::InitialWindowBelowMinimum {
                initial: window.initial_window,
                min: window.min_window,
            });
        }
        if !(window.additive_increase.is_finite() && window.additive_increase > 0.0) {
            return Err(invalid("additive_increase", window.additive_increase));
        }
        if !(window.decrease_factor > 0.0 && window.decrease_factor <= 1.0) {
            return Err(invalid("decrease_factor", window.decrease_factor));
        }

        let delay = &self.delay;
        if delay.min_delay_threshold_ms >= delay.max_delay_threshold_ms
            || delay.decrease_delay_threshold_ms < delay.min_delay_threshold_ms
            || delay.decrease_delay_threshold_ms > delay.max_delay_threshold_ms
        {
            return Err(Error::InvalidDelayThresholds {
                min_ms: delay.min_delay_threshold_ms,
                decrease_ms: delay.decrease_delay_threshold_ms,
                max_ms: delay.max_delay_threshold_ms,
            });
        }
        for (name, value) in [
            ("diff_epsilon_ms", delay.diff_epsilon_ms),
            ("prediction_steps", delay.prediction_steps),
            ("damping_ratio", delay.damping_ratio),
            ("trim_gain", delay.trim_gain),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(name, value));
            }
        }

        if self.timeout.fixed_timeout_ms == 0 {
            return Err(invalid("fixed_timeout_ms", self.timeout.fixed_timeout_ms));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: impl ToString) -> Error {
    Error::InvalidParameter {
        name,
        value: value.to_string(),
    }
}
