//! Defines the pluggable congestion control interface.
//! 定义了可插拔的拥塞控制接口。

pub mod delay_gradient;
pub mod policy;
pub mod sample;
pub mod trend;

#[cfg(test)]
mod tests;

pub use delay_gradient::{ControllerStats, DelayGradientController};
pub use sample::{AckEvent, DelaySample};
pub use trend::{Trend, TrendAnalyzer};

/// What the window policy did in response to an event.
///
/// 窗口策略对事件做出的动作。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    /// The path is underloaded; the window grew.
    /// 路径负载较轻，窗口增长。
    Grow,
    /// Sustained congestion; the window was cut multiplicatively.
    /// 持续拥塞，窗口被乘性削减。
    Shrink,
    /// Delay is rising and accelerating; the window was trimmed pre-emptively.
    /// 延迟正在加速上升，窗口被预防性削减。
    Trim,
    /// No rule fired.
    /// 没有规则被触发。
    Hold,
}

/// The result of a single control decision.
///
/// 单次控制决策的结果。
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDecision {
    /// The raw window after the decision, in datagrams.
    /// 决策后的原始窗口（以数据报为单位）。
    pub window: f64,
    /// The rule that fired.
    /// 被触发的规则。
    pub action: WindowAction,
    /// Whether the window was raised to the configured floor.
    /// 窗口是否被提升到配置的下限。
    pub clamped: bool,
    /// Whether the integer window visible to the sender changed.
    /// 发送方可见的整数窗口是否发生了变化。
    pub significant_change: bool,
}

/// A trait for congestion control algorithms.
///
/// The driving loop must serialize all calls; the controller does no locking.
///
/// 拥塞控制算法的 trait。驱动循环必须串行化所有调用。
pub trait CongestionControl: std::fmt::Debug + Send + Sync {
    /// Gets the number of datagrams currently permitted in flight.
    ///
    /// 获取当前允许在途的数据报数量。
    fn window_size(&self) -> u32;

    /// Called when a datagram is sent.
    ///
    /// 当一个数据报被发送时调用。
    fn on_sent(&mut self, sequence_number: u64, send_ms: u64);

    /// Called when an acknowledgment arrives.
    ///
    /// 当一个确认到达时调用。
    fn on_ack_received(&mut self, ack: AckEvent) -> WindowDecision;

    /// Called when the driving loop declares an outstanding datagram lost.
    ///
    /// 当驱动循环判定某个在途数据报丢失时调用。
    fn on_timeout(&mut self) -> WindowDecision;

    /// How long to wait without acks before giving up on a datagram.
    ///
    /// 在没有ACK的情况下放弃一个数据报前需要等待的时长。
    fn retransmission_timeout_ms(&self) -> u64;
}

impl<T: CongestionControl + ?Sized> CongestionControl for Box<T> {
    fn window_size(&self) -> u32 {
        (**self).window_size()
    }

    fn on_sent(&mut self, sequence_number: u64, send_ms: u64) {
        (**self).on_sent(sequence_number, send_ms)
    }

    fn on_ack_received(&mut self, ack: AckEvent) -> WindowDecision {
        (**self).on_ack_received(ack)
    }

    fn on_timeout(&mut self) -> WindowDecision {
        (**self).on_timeout()
    }

    fn retransmission_timeout_ms(&self) -> u64 {
        (**self).retransmission_timeout_ms()
    }
}
