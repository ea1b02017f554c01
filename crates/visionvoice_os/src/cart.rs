#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use visionvoice_kernel_contracts::order::CartDelta;

/// Reference caller-side fold for the deltas a turn emits.
///
/// The order engine never touches this store; the UI owns cart state and
/// is obliged to apply deltas in emission order without deduplication.
/// Lines folded to zero or below disappear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    lines: BTreeMap<String, i32>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, deltas: &[CartDelta]) {
        for delta in deltas {
            let folded = self.quantity(&delta.name).saturating_add(delta.quantity);
            if folded <= 0 {
                self.lines.remove(&delta.name);
            } else {
                self.lines.insert(delta.name.clone(), folded);
            }
        }
    }

    pub fn quantity(&self, name: &str) -> i32 {
        self.lines.get(name).copied().unwrap_or(0)
    }

    pub fn lines(&self) -> &BTreeMap<String, i32> {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
