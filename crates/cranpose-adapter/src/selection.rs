//! Single-selection bookkeeping for a component view.

/// Result of [`SingleSelection::select`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionChange {
    /// Previously selected index that was cleared to make room, if any.
    pub deselected: Option<usize>,
    pub selected: usize,
}

/// Tracks at most one selected index plus a revision counter.
///
/// The revision bumps only when the selected index actually changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SingleSelection {
    selected: Option<usize>,
    revision: u64,
}

impl SingleSelection {
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Selects `index`, clearing any other selection first.
    pub fn select(&mut self, index: usize) -> SelectionChange {
        let deselected = self.selected.filter(|&current| current != index);
        if self.selected != Some(index) {
            self.selected = Some(index);
            self.bump_revision();
        }
        SelectionChange {
            deselected,
            selected: index,
        }
    }

    /// Clears the selection if `index` is the selected one.
    pub fn deselect(&mut self, index: usize) -> bool {
        if self.selected == Some(index) {
            self.clear();
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        if self.selected.take().is_some() {
            self.bump_revision();
        }
    }

    pub(crate) fn shift_for_insert(&mut self, at: usize, count: usize) {
        if let Some(current) = self.selected {
            if current >= at && count > 0 {
                self.selected = Some(current + count);
                self.bump_revision();
            }
        }
    }

    pub(crate) fn shift_for_remove(&mut self, at: usize) {
        match self.selected {
            Some(current) if current == at => self.clear(),
            Some(current) if current > at => {
                self.selected = Some(current - 1);
                self.bump_revision();
            }
            _ => {}
        }
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
