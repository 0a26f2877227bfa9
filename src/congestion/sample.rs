//! Turns an acknowledgment into a delay sample.

/// An acknowledgment as reported by the driving loop.
///
/// All timestamps are in milliseconds. `send_ms` and `ack_receipt_ms` come from
/// the sender's clock, `receiver_ms` from the receiver's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AckEvent {
    /// The sequence number that was acknowledged.
    pub sequence_number: u64,
    /// When the acknowledged datagram was sent.
    pub send_ms: u64,
    /// When the receiver got the datagram, by its own clock.
    pub receiver_ms: u64,
    /// When the ack reached the sender.
    pub ack_receipt_ms: u64,
}

impl AckEvent {
    pub fn new(sequence_number: u64, send_ms: u64, receiver_ms: u64, ack_receipt_ms: u64) -> Self {
        Self {
            sequence_number,
            send_ms,
            receiver_ms,
            ack_receipt_ms,
        }
    }

    /// Measures the delay carried by this ack.
    ///
    /// Clock skew is not validated: a receipt time at or before the send time
    /// yields a zero or negative delay, which downstream stages guard against.
    pub fn delay_sample(&self) -> DelaySample {
        DelaySample {
            delay_ms: self.ack_receipt_ms as f64 - self.send_ms as f64,
            ack_receipt_ms: self.ack_receipt_ms,
        }
    }
}

/// One delay measurement and the sender-clock time it was taken at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelaySample {
    pub delay_ms: f64,
    pub ack_receipt_ms: u64,
}

impl DelaySample {
    /// Whether the sample can be used as a divisor.
    pub fn is_positive(&self) -> bool {
        self.delay_ms > 0.0
    }
}
