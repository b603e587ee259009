use crate::observation::PositionSample;

/// Ordered ball positions accumulated since the last completed shot
#[derive(Debug, Clone, Default)]
pub struct TrajectoryBuffer {
    samples: Vec<PositionSample>,
}

impl TrajectoryBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self { samples: Vec::new() }
    }

    /// Append a sample; insertion order is authoritative, timestamps are not re-sorted
    pub fn append(&mut self, sample: PositionSample) {
        self.samples.push(sample);
    }

    /// Drop every sample
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Returns the `n` most recent samples, oldest first.
    /// Empty when fewer than `n` samples exist.
    pub fn last(&self, n: usize) -> &[PositionSample] {
        if n == 0 || self.samples.len() < n {
            &[]
        } else {
            &self.samples[self.samples.len() - n..]
        }
    }

    /// Get a reference to the sample that opened the trajectory
    pub fn peek_front(&self) -> Option<&PositionSample> {
        self.samples.first()
    }

    pub fn peek_back(&self) -> Option<&PositionSample> {
        self.samples.last()
    }

    pub fn samples(&self) -> &[PositionSample] {
        &self.samples
    }

    /// Get the number of samples in the buffer
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
