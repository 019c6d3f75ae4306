// src/feed/rotation.rs
use crate::feed::BATCH_SIZE;

/// Cursor over the event list showing a fixed-size window that advances by
/// one batch per tick and wraps around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotator {
    start: usize,
    batch: usize,
}

impl Default for Rotator {
    fn default() -> Self {
        Self::new(BATCH_SIZE)
    }
}

impl Rotator {
    pub fn new(batch: usize) -> Self {
        Self {
            start: 0,
            batch: batch.max(1),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn batch(&self) -> usize {
        self.batch
    }

    /// Move one batch forward over a list of `len` items.
    pub fn advance(&mut self, len: usize) {
        self.start = (self.start + self.batch) % len.max(1);
    }

    /// Items visible at the current position. If the list shrank under the
    /// cursor, the first batch is shown instead of nothing.
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = (self.start + self.batch).min(items.len());
        match items.get(self.start..end) {
            Some(w) if !w.is_empty() => w,
            _ => &items[..self.batch.min(items.len())],
        }
    }
}
