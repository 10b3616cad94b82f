//! Helpers for consumers of the output channel
//!
//! Results arrive in whatever order the workers finish. Painting needs them
//! by line, so these helpers index results by the line they carry rather
//! than by arrival order.

use crate::types::{LineIndex, LineResult};
use crossbeam_channel::Receiver;

/// Drain everything currently queued and sort it by line index
pub fn collect_ordered(results: &Receiver<LineResult>) -> Vec<LineResult> {
    let mut collected: Vec<LineResult> = results.try_iter().collect();
    collected.sort_by_key(|r| r.line);
    collected
}

/// Results slotted by line index
#[derive(Debug, Clone, Default)]
pub struct LineTable {
    slots: Vec<Option<LineResult>>,
}

impl LineTable {
    pub fn new(line_count: usize) -> Self {
        Self {
            slots: vec![None; line_count],
        }
    }

    /// Receive until the channel closes, slotting each result
    pub fn from_receiver(results: &Receiver<LineResult>, line_count: usize) -> Self {
        let mut table = Self::new(line_count);
        for result in results.iter() {
            table.insert(result);
        }
        table
    }

    /// Store a result in its line's slot, returning any result it replaced
    ///
    /// Results for lines beyond the table grow it.
    pub fn insert(&mut self, result: LineResult) -> Option<LineResult> {
        let index = result.line.index();
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index].replace(result)
    }

    pub fn get(&self, line: LineIndex) -> Option<&LineResult> {
        self.slots.get(line.index())?.as_ref()
    }

    /// Lines that have no result yet
    pub fn missing(&self) -> impl Iterator<Item = LineIndex> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(i, _)| LineIndex(i as u32))
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Number of lines holding a result
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Present results in line order
    pub fn iter(&self) -> impl Iterator<Item = &LineResult> {
        self.slots.iter().flatten()
    }

    /// Vertical pixel offset of every line, from the heights carried by the results
    ///
    /// Missing lines contribute no height.
    pub fn row_offsets(&self) -> Vec<i64> {
        let mut offset = 0i64;
        self.slots
            .iter()
            .map(|slot| {
                let top = offset;
                offset += slot.as_ref().map_or(0, |r| r.height.max(0) as i64);
                top
            })
            .collect()
    }
}
