//! Tests for the delay-gradient controller and its stages.


use super::AckEvent;

/// Builds the `index`-th ack of a run where datagrams leave every 10ms and
/// come back after `delay_ms`.
fn spaced_ack(index: u64, delay_ms: u64) -> AckEvent {
    let send_ms = index * 10;
    AckEvent::new(index, send_ms, send_ms + delay_ms / 2, send_ms + delay_ms)
}
