use crate::util::mean;
use serde::{Deserialize, Serialize};

/// Number of most recent samples the window keeps.
pub const CAPACITY: usize = 10;

const MILLIS_IN_SECOND: f64 = 1000.0;

/// Rolling mean over the last [`CAPACITY`] durations, kept in a ring buffer.
///
/// Samples are stored as whole milliseconds to keep the statistics file small.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowedAverage {
    #[serde(rename = "l")]
    length: usize,
    #[serde(rename = "i")]
    index: usize,
    #[serde(rename = "v")]
    values: [i64; CAPACITY],
}

impl WindowedAverage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a duration in seconds, overwriting the oldest sample once full.
    pub fn append(&mut self, seconds: f64) {
        self.values[self.index % CAPACITY] = (seconds * MILLIS_IN_SECOND).round() as i64;
        self.index = (self.index + 1) % CAPACITY;
        if self.length < CAPACITY {
            self.length += 1;
        }
    }

    /// Mean of the recorded samples in seconds, or `default` when nothing was recorded.
    pub fn average(&self, default: f64) -> f64 {
        let samples: Vec<f64> = self.values[..self.length.min(CAPACITY)]
            .iter()
            .map(|&ms| ms as f64 / MILLIS_IN_SECOND)
            .collect();

        mean(&samples).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.length.min(CAPACITY)
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}
