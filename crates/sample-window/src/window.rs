//! Ring-Backed Sample Window

/// Fixed-capacity history of the most recent samples
pub struct SampleWindow {
    /// Pre-allocated storage
    storage: Box<[f64]>,
    /// Next write position
    head: usize,
    /// Number of valid samples (saturates at capacity)
    len: usize,
}

impl SampleWindow {
    /// Create an empty window holding up to `capacity` samples
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Window capacity must be > 0");
        Self {
            storage: vec![0.0; capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    /// Append a sample, overwriting the oldest once full
    pub fn push(&mut self, sample: f64) {
        self.storage[self.head] = sample;
        self.head = (self.head + 1) % self.storage.len();
        self.len = (self.len + 1).min(self.storage.len());
    }

    /// Append every sample of `samples` in order
    pub fn extend_from_slice(&mut self, samples: &[f64]) {
        for &sample in samples {
            self.push(sample);
        }
    }

    /// Number of valid samples
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if window is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if every slot holds a sample
    pub fn is_full(&self) -> bool {
        self.len == self.storage.len()
    }

    /// Samples still needed before the window is full
    pub fn missing(&self) -> usize {
        self.storage.len() - self.len
    }

    /// Copy the valid samples, oldest first, into the start of `out`.
    ///
    /// Returns the number of samples copied. Panics if `out` is shorter
    /// than [`len`](Self::len).
    pub fn copy_to(&self, out: &mut [f64]) -> usize {
        assert!(out.len() >= self.len, "Output slice shorter than window contents");
        let capacity = self.storage.len();
        let start = (self.head + capacity - self.len) % capacity;

        let first = (capacity - start).min(self.len);
        out[..first].copy_from_slice(&self.storage[start..start + first]);
        out[first..self.len].copy_from_slice(&self.storage[..self.len - first]);
        self.len
    }

    /// Drop every sample
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}
