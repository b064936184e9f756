// src/engine/progress.rs

/// Decides which items of a batch publish a progress event.
///
/// Small batches report every item. Larger ones report every `stride`-th
/// item, always including the first and the last, so that at most about
/// `max_updates` events are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressThrottle {
    total: usize,
    stride: usize,
}

impl ProgressThrottle {
    pub fn new(total: usize, max_updates: usize) -> Self {
        let max_updates = max_updates.max(1);
        let stride = if total <= max_updates {
            1
        } else {
            total.div_ceil(max_updates)
        };
        Self { total, stride }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// `current` is 1-based.
    pub fn should_emit(&self, current: usize) -> bool {
        current == 1 || current == self.total || current % self.stride == 0
    }
}
