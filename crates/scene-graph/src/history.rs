use std::collections::VecDeque;

use crate::model::GraphSnapshot;

/// Linear undo/redo log of full graph snapshots.
///
/// `index` is `None` until the first push. Pushing after an undo discards
/// the redo branch; there is no history tree.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<GraphSnapshot>,
    index: Option<usize>,
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` snapshots, dropping the oldest first.
    /// A limit of zero is treated as one.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::default()
        }
    }

    pub fn push(&mut self, snapshot: GraphSnapshot) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push_back(snapshot);

        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                self.entries.pop_front();
            }
        }
        self.index = Some(self.entries.len() - 1);
    }

    pub fn undo(&mut self) -> Result<&GraphSnapshot, HistoryError> {
        match self.index {
            Some(i) if i > 0 => {
                self.index = Some(i - 1);
                Ok(&self.entries[i - 1])
            }
            _ => Err(HistoryError::NoHistory),
        }
    }

    pub fn redo(&mut self) -> Result<&GraphSnapshot, HistoryError> {
        match self.index {
            Some(i) if i + 1 < self.entries.len() => {
                self.index = Some(i + 1);
                Ok(&self.entries[i + 1])
            }
            _ => Err(HistoryError::NoHistory),
        }
    }

    pub fn current(&self) -> Option<&GraphSnapshot> {
        self.index.and_then(|i| self.entries.get(i))
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.index, Some(i) if i > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.index, Some(i) if i + 1 < self.entries.len())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    #[error("nothing to undo or redo")]
    NoHistory,
}
