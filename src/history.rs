//! Snapshot-based undo history for region edits.
//!
//! Every mutating editor operation pushes an [`EditHistory`] holding the state
//! *before* the change. Undo pops the most recent snapshot and restores it.
//! There is no redo.
//!
//! Region lists are immutable once published (`Rc<Vec<Region>>`, replaced
//! wholesale on every edit), so a snapshot shares the list it captured instead
//! of deep-copying it.

use std::rc::Rc;

use crate::model::{Region, RegionHandle};

/// Shared, immutable region list as published to the host.
pub type RegionList = Rc<Vec<Region>>;

/// Editor state captured immediately before a mutating operation.
#[derive(Debug, Clone)]
pub struct EditHistory {
    /// Region that was selected at capture time
    pub selected: Option<RegionHandle>,
    /// Region list at capture time
    pub regions: RegionList,
}

impl EditHistory {
    pub fn new(selected: Option<RegionHandle>, regions: RegionList) -> Self {
        Self { selected, regions }
    }

    /// The selected region as it looked in this snapshot.
    pub fn selected_region(&self) -> Option<&Region> {
        let handle = self.selected?;
        self.regions.iter().find(|r| r.handle == handle)
    }
}

/// LIFO stack of [`EditHistory`] snapshots.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    /// Oldest first, most recent at the end
    entries: Vec<EditHistory>,
    /// Maximum number of snapshots kept (`None` = unlimited)
    max_history: Option<usize>,
}

impl HistoryStack {
    /// Create an unlimited history stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history stack that drops its oldest snapshots beyond `max_history`.
    pub fn with_limit(max_history: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            max_history,
        }
    }

    /// Push a snapshot (call this BEFORE making a change).
    pub fn push(&mut self, entry: EditHistory) {
        self.entries.push(entry);

        if let Some(max) = self.max_history
            && self.entries.len() > max
        {
            let excess = self.entries.len() - max;
            self.entries.drain(..excess);
        }
        log::debug!("Undo: pushed snapshot ({} in history)", self.entries.len());
    }

    /// Pop the most recent snapshot, or `None` if history is empty.
    pub fn pop(&mut self) -> Option<EditHistory> {
        let entry = self.entries.pop()?;
        log::debug!("Undo: popped snapshot ({} left)", self.entries.len());
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent snapshot without removing it.
    pub fn peek(&self) -> Option<&EditHistory> {
        self.entries.last()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
        log::debug!("Undo history cleared");
    }
}
