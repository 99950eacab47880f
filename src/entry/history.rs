//! Fixed-size entry history (§4.2): each entered line keeps a snapshot of
//! its input tree and, if it evaluated to a value, that value (rendering it
//! is deferred to whoever displays it, since a `Value` is arena-free and
//! cheap to clone, unlike a `NedaTree`).

use std::collections::VecDeque;

use crate::eval::token::Value;
use crate::neda::NedaTree;

pub const CAPACITY: usize = 5;

pub struct HistoryEntry {
    pub input: NedaTree,
    pub result: Option<Value>,
}

#[derive(Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self { entries: VecDeque::new() }
    }

    pub fn push(&mut self, input: NedaTree, result: Option<Value>) {
        if self.entries.len() == CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry { input, result });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `0` is the most recently entered line, `len() - 1` the oldest still
    /// retained.
    pub fn get(&self, back: usize) -> Option<&HistoryEntry> {
        let len = self.entries.len();
        (len > back).then(|| &self.entries[len - 1 - back])
    }

    pub fn most_recent_result(&self) -> Option<&Value> {
        self.entries.back().and_then(|e| e.result.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut h = History::new();
        for _ in 0..CAPACITY + 2 {
            h.push(NedaTree::new(), None);
        }
        assert_eq!(h.len(), CAPACITY);
    }

    #[test]
    fn get_zero_is_most_recent() {
        let mut h = History::new();
        let mut first = NedaTree::new();
        first.push_str(first.root, "1");
        let mut second = NedaTree::new();
        second.push_str(second.root, "2");
        h.push(first, None);
        h.push(second, None);
        let top = h.get(0).unwrap();
        assert_eq!(top.input.child_count(top.input.root), 1);
        assert_eq!(top.input.child_at(top.input.root, 0), crate::neda::NedaChild::Char(b'2'));
    }
}
