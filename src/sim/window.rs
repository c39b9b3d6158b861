//! Streaming window of live steps
//!
//! Steps are kept in index order, so lookup is the offset from the first
//! retained index and eviction pops from the front.

use std::collections::VecDeque;

use super::step::{Chunk, Step};

#[derive(Debug, Clone, Default)]
pub struct StepWindow {
    steps: VecDeque<Step>,
}

impl StepWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a freshly generated chunk (must continue the retained range)
    pub fn push_chunk(&mut self, chunk: Chunk) {
        debug_assert!(
            self.steps.is_empty() || chunk.steps.first().map(|s| s.index) == self.end_index(),
            "chunk {} does not continue the window",
            chunk.index
        );
        self.steps.extend(chunk.steps);
    }

    /// Index of the oldest retained step
    pub fn first_index(&self) -> Option<u32> {
        self.steps.front().map(|s| s.index)
    }

    /// One past the newest retained step
    pub fn end_index(&self) -> Option<u32> {
        self.steps.back().map(|s| s.index + 1)
    }

    fn offset(&self, index: u32) -> Option<usize> {
        let first = self.first_index()?;
        let offset = index.checked_sub(first)? as usize;
        (offset < self.steps.len()).then_some(offset)
    }

    pub fn get(&self, index: u32) -> Option<&Step> {
        self.offset(index).and_then(|i| self.steps.get(i))
    }

    pub fn get_mut(&mut self, index: u32) -> Option<&mut Step> {
        self.offset(index).and_then(|i| self.steps.get_mut(i))
    }

    pub fn contains(&self, index: u32) -> bool {
        self.offset(index).is_some()
    }

    /// Drop every step with an index below `index`
    pub fn evict_below(&mut self, index: u32) -> usize {
        let mut evicted = 0;
        while self.steps.front().is_some_and(|s| s.index < index) {
            self.steps.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Un-hit spikes and un-collect gems for a fresh run on the same path
    pub fn reset_flags(&mut self) {
        for step in self.steps.iter_mut() {
            step.reset_flags();
        }
    }
}
