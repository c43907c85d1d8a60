//! Rolling History Buffer
//!
//! Fixed-capacity series of power readings for the trend chart.
//! Oldest reading is evicted first; newest is always last.

use std::collections::VecDeque;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

// ============================================================================
// BUFFER
// ============================================================================

#[derive(Debug)]
pub struct HistoryBuffer {
    capacity: usize,
    readings: RwLock<VecDeque<f64>>,
}

impl HistoryBuffer {
    /// Capacity below 1 is raised to 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            readings: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push a reading, evicting the oldest at capacity
    pub fn append(&self, power_watts: f64) {
        let mut readings = self.readings.write();
        while readings.len() >= self.capacity {
            readings.pop_front();
        }
        readings.push_back(power_watts);
    }

    /// Ordered copy, oldest first. Taken under one read guard.
    pub fn snapshot(&self) -> Vec<f64> {
        self.readings.read().iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.readings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.read().is_empty()
    }

    pub fn latest(&self) -> Option<f64> {
        self.readings.read().back().copied()
    }

    pub fn clear(&self) {
        self.readings.write().clear();
    }

    pub fn status(&self) -> HistoryStatus {
        let len = self.len();
        HistoryStatus {
            current_size: len,
            capacity: self.capacity,
            is_full: len >= self.capacity,
            fill_percent: (len as f32 / self.capacity as f32 * 100.0).min(100.0),
        }
    }
}

/// Buffer status information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryStatus {
    pub current_size: usize,
    pub capacity: usize,
    pub is_full: bool,
    pub fill_percent: f32,
}
