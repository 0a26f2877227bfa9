//! Delay trend analysis.
//!
//! Keeps a one-sample history and derives the first and second derivative of
//! delay plus a short linear extrapolation of where delay is heading.

use super::sample::DelaySample;
use tracing::{debug, trace};

/// The trend derived from one new sample.
///
/// `previous` is the sample that was current before this one arrived. The
/// policy reads it from here instead of from the analyzer, which has already
/// moved on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    pub sample: DelaySample,
    pub previous: Option<DelaySample>,
    /// Change in delay since the previous sample, in ms.
    pub diff_ms: f64,
    /// Change in delay per ms of sender time.
    pub velocity: f64,
    /// Change in velocity since the previous sample.
    pub acceleration: f64,
    /// Extrapolated delay a few samples ahead, in ms.
    pub prediction_ms: f64,
}

impl Trend {
    pub fn delay_ms(&self) -> f64 {
        self.sample.delay_ms
    }
}

/// Trend analyzer with one sample of history.
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    last: Option<DelaySample>,
    last_velocity: f64,
    prediction_steps: f64,
}

impl TrendAnalyzer {
    pub fn new(prediction_steps: f64) -> Self {
        Self {
            last: None,
            last_velocity: 0.0,
            prediction_steps,
        }
    }

    /// Folds a new sample into the history and returns its trend.
    pub fn observe(&mut self, sample: DelaySample) -> Trend {
        let previous = self.last.replace(sample);

        let Some(prev) = previous else {
            trace!(delay_ms = sample.delay_ms, "First delay sample, no trend yet");
            return Trend {
                sample,
                previous: None,
                diff_ms: 0.0,
                velocity: 0.0,
                acceleration: 0.0,
                prediction_ms: sample.delay_ms,
            };
        };

        let diff_ms = sample.delay_ms - prev.delay_ms;
        let (velocity, acceleration) = if sample.ack_receipt_ms > prev.ack_receipt_ms {
            let time_delta = (sample.ack_receipt_ms - prev.ack_receipt_ms) as f64;
            let velocity = diff_ms / time_delta;
            let acceleration = velocity - self.last_velocity;
            self.last_velocity = velocity;
            (velocity, acceleration)
        } else {
            // Duplicate or reordered ack: no usable time base.
            debug!(
                ack_ms = sample.ack_receipt_ms,
                prev_ack_ms = prev.ack_receipt_ms,
                "Non-increasing ack time, skipping velocity update"
            );
            (0.0, 0.0)
        };
        let prediction_ms = sample.delay_ms + self.prediction_steps * diff_ms;

        trace!(
            delay_ms = sample.delay_ms,
            diff_ms,
            velocity,
            acceleration,
            prediction_ms,
            "Delay trend updated"
        );

        Trend {
            sample,
            previous: Some(prev),
            diff_ms,
            velocity,
            acceleration,
            prediction_ms,
        }
    }

    pub fn last_sample(&self) -> Option<DelaySample> {
        self.last
    }

    pub fn last_velocity(&self) -> f64 {
        self.last_velocity
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.last_velocity = 0.0;
    }
}
