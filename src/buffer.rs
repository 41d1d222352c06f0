//! Time-ordered retention buffer for admitted samples

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use log::{debug, warn};

use crate::config::RetentionPolicy;
use crate::sample::{Sample, Timestamp};

/// Ordered window of admitted samples
///
/// Samples are kept ascending by timestamp, ties in admission order. The
/// buffer performs no admission logic; it only stores what it is handed and
/// evicts from the head to satisfy its [`RetentionPolicy`].
///
/// ## Eviction
///
/// - **Duration**: [`enforce`](Self::enforce) drops samples older than
///   `now - horizon`. Because the sequence is ordered, only the head needs
///   inspecting, so each eviction is amortized O(1).
/// - **Capacity**: [`append`](Self::append) drops the oldest samples as soon
///   as the length would exceed the configured maximum.
#[derive(Debug, Clone)]
pub struct RetentionBuffer {
    samples: VecDeque<Sample>,
    policy: RetentionPolicy,
}

impl RetentionBuffer {
    pub fn new(policy: RetentionPolicy) -> Self {
        let samples = match policy {
            RetentionPolicy::Capacity { max_samples } => VecDeque::with_capacity(max_samples),
            RetentionPolicy::Duration { .. } => VecDeque::new(),
        };

        Self { samples, policy }
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Insert a sample at the tail
    ///
    /// A sample older than the current tail is placed at its ordered
    /// position, after any samples sharing its timestamp. Under a capacity
    /// policy the oldest samples beyond the bound are dropped and their
    /// count returned.
    pub fn append(&mut self, sample: Sample) -> usize {
        match self.samples.back() {
            Some(tail) if sample.timestamp < tail.timestamp => {
                warn!(
                    "Out-of-order sample at {} (tail {}), inserting in place",
                    sample.timestamp, tail.timestamp
                );
                let index = self
                    .samples
                    .partition_point(|s| s.timestamp <= sample.timestamp);
                self.samples.insert(index, sample);
            }
            _ => self.samples.push_back(sample),
        }

        match self.policy {
            RetentionPolicy::Capacity { max_samples } => self.evict_beyond(max_samples),
            RetentionPolicy::Duration { .. } => 0,
        }
    }

    /// Remove samples from the head while their timestamp is before `cutoff`
    ///
    /// Returns the number of evicted samples. Repeating the call with the
    /// same or an earlier cutoff is a no-op.
    pub fn evict_older_than(&mut self, cutoff: Timestamp) -> usize {
        let mut evicted = 0;
        while self
            .samples
            .front()
            .is_some_and(|head| head.timestamp < cutoff)
        {
            self.samples.pop_front();
            evicted += 1;
        }

        if evicted > 0 {
            debug!("Evicted {} samples older than {}", evicted, cutoff);
        }
        evicted
    }

    /// Apply the configured policy as of `now`
    pub fn enforce(&mut self, now: Timestamp) -> usize {
        match self.policy {
            RetentionPolicy::Duration { horizon_ms } => {
                self.evict_older_than(now.saturating_sub(horizon_ms))
            }
            RetentionPolicy::Capacity { max_samples } => self.evict_beyond(max_samples),
        }
    }

    fn evict_beyond(&mut self, max_samples: usize) -> usize {
        let excess = self.samples.len().saturating_sub(max_samples);
        if excess > 0 {
            self.samples.drain(..excess);
            debug!("Evicted {} samples beyond capacity {}", excess, max_samples);
        }
        excess
    }

    /// Owned copy of the current contents, oldest first
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    /// Iterate the current contents without copying, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Sample> + ExactSizeIterator {
        self.samples.iter()
    }

    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    pub fn newest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
