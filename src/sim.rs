//! A deterministic driving loop over a simulated bottleneck link.
//!
//! The simulator plays the part of the sender's event loop: it asks the
//! controller for its window, sends while there is room, delivers acks when
//! they are due, and reports datagrams that were not acked within the
//! retransmission timeout as timeouts. Time advances in whole milliseconds and
//! randomness comes from a seeded RNG, so the same inputs always produce the
//! same run.

use crate::congestion::{AckEvent, CongestionControl};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use tracing::{debug, info};

/// A single-queue link between sender and receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkModel {
    /// Propagation delay in each direction.
    pub one_way_delay_ms: u64,
    /// Time the bottleneck needs to serialize one datagram.
    pub service_interval_ms: u64,
    /// Extra forward delay drawn uniformly from `0..=jitter_ms`.
    pub jitter_ms: u64,
    /// Probability that a datagram is dropped and never acknowledged.
    pub loss_probability: f64,
}

impl Default for LinkModel {
    fn default() -> Self {
        Self {
            one_way_delay_ms: 20,
            service_interval_ms: 1,
            jitter_ms: 0,
            loss_probability: 0.0,
        }
    }
}

/// What happened during a run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimulationReport {
    /// `(time_ms, window_size)` recorded every time the window changed.
    pub window_trajectory: Vec<(u64, u32)>,
    pub sent: u64,
    /// Acks that arrived before their datagram timed out.
    pub acked: u64,
    /// Acks for datagrams already reported as timed out.
    pub late_acks: u64,
    pub timed_out: u64,
    /// Delay statistics over every ack, late ones included.
    pub mean_delay_ms: f64,
    pub max_delay_ms: u64,
}

impl SimulationReport {
    /// The smallest window the sender saw.
    pub fn min_window(&self) -> Option<u32> {
        self.window_trajectory.iter().map(|&(_, w)| w).min()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PendingAck {
    ack_receipt_ms: u64,
    sequence_number: u64,
    send_ms: u64,
    receiver_ms: u64,
}

/// Drives a controller against a [`LinkModel`].
#[derive(Debug)]
pub struct Simulation {
    link: LinkModel,
    rng: StdRng,
}

impl Simulation {
    pub fn new(link: LinkModel, seed: u64) -> Self {
        Self {
            link,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Runs the loop for `duration_ms` simulated milliseconds.
    pub fn run<C: CongestionControl>(
        &mut self,
        controller: &mut C,
        duration_ms: u64,
    ) -> SimulationReport {
        let mut report = SimulationReport::default();
        let mut in_flight: BTreeMap<u64, u64> = BTreeMap::new();
        let mut pending: BinaryHeap<Reverse<PendingAck>> = BinaryHeap::new();
        let mut link_free_at = 0u64;
        let mut next_seq = 0u64;
        let mut total_delay = 0u64;
        let rto = controller.retransmission_timeout_ms();

        report.window_trajectory.push((0, controller.window_size()));

        for now in 0..duration_ms {
            while let Some(Reverse(ack)) = pending.peek().copied() {
                if ack.ack_receipt_ms > now {
                    break;
                }
                pending.pop();
                // Late acks for timed-out datagrams still carry a delay sample.
                if in_flight.remove(&ack.sequence_number).is_some() {
                    report.acked += 1;
                } else {
                    report.late_acks += 1;
                }
                controller.on_ack_received(AckEvent::new(
                    ack.sequence_number,
                    ack.send_ms,
                    ack.receiver_ms,
                    ack.ack_receipt_ms,
                ));
                let delay = ack.ack_receipt_ms - ack.send_ms;
                total_delay += delay;
                report.max_delay_ms = report.max_delay_ms.max(delay);
            }

            let expired: Vec<u64> = in_flight
                .iter()
                .filter(|&(_, &sent)| sent + rto <= now)
                .map(|(&seq, _)| seq)
                .collect();
            for seq in expired {
                in_flight.remove(&seq);
                controller.on_timeout();
                report.timed_out += 1;
                debug!(seq, now_ms = now, "Datagram timed out");
            }

            while (in_flight.len() as u64) < controller.window_size() as u64 {
                let seq = next_seq;
                next_seq += 1;
                controller.on_sent(seq, now);
                in_flight.insert(seq, now);
                report.sent += 1;

                let loss = self.link.loss_probability;
                if loss > 0.0 && self.rng.random_bool(loss.min(1.0)) {
                    continue;
                }

                let departs = link_free_at.max(now) + self.link.service_interval_ms;
                link_free_at = departs;
                let jitter = if self.link.jitter_ms > 0 {
                    self.rng.random_range(0..=self.link.jitter_ms)
                } else {
                    0
                };
                let receiver_ms = departs + self.link.one_way_delay_ms + jitter;
                pending.push(Reverse(PendingAck {
                    ack_receipt_ms: receiver_ms + self.link.one_way_delay_ms,
                    sequence_number: seq,
                    send_ms: now,
                    receiver_ms,
                }));
            }

            let window = controller.window_size();
            if report.window_trajectory.last().map(|&(_, w)| w) != Some(window) {
                report.window_trajectory.push((now, window));
            }
        }

        let delivered = report.acked + report.late_acks;
        if delivered > 0 {
            report.mean_delay_ms = total_delay as f64 / delivered as f64;
        }
        info!(
            sent = report.sent,
            acked = report.acked,
            late_acks = report.late_acks,
            timed_out = report.timed_out,
            mean_delay_ms = report.mean_delay_ms,
            max_delay_ms = report.max_delay_ms,
            "Simulation finished"
        );
        report
    }
}
