use std::collections::BTreeSet;
use tracing::debug;

use crate::model::{Directory, EmployeeId};
use crate::tree::DepthLimit;

/// Expansion and selection state of the chart.
///
/// Holds employee ids only; every use looks the id up again in the current
/// [`Directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeViewState {
    expanded: BTreeSet<EmployeeId>,
    selected: Option<EmployeeId>,
    depth_limit: DepthLimit,
}

impl TreeViewState {
    pub fn new(directory: &Directory) -> Self {
        Self::with_depth_limit(directory, DepthLimit::default())
    }

    pub fn with_depth_limit(directory: &Directory, depth_limit: DepthLimit) -> Self {
        Self {
            expanded: directory.root().map(|root| root.id).into_iter().collect(),
            selected: None,
            depth_limit,
        }
    }

    pub fn expanded(&self) -> &BTreeSet<EmployeeId> {
        &self.expanded
    }

    pub fn is_expanded(&self, id: EmployeeId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn selected(&self) -> Option<EmployeeId> {
        self.selected
    }

    pub fn depth_limit(&self) -> DepthLimit {
        self.depth_limit
    }

    /// Flip a single node open or closed. Selection is untouched.
    pub fn toggle(&mut self, id: EmployeeId) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
        debug!(%id, expanded = self.expanded.contains(&id), "toggle");
    }

    /// Accordion select: open exactly the path from the top down to `id`.
    ///
    /// Clicking an id that is not in the directory leaves the state as is.
    pub fn click(&mut self, directory: &Directory, id: EmployeeId) {
        let Some(employee) = directory.get(id) else {
            debug!(%id, "click on unknown employee ignored");
            return;
        };
        let mut expanded: BTreeSet<EmployeeId> = directory.ancestors(id).into_iter().collect();
        if employee.has_reports() {
            expanded.insert(id);
        }
        self.expanded = expanded;
        self.selected = Some(id);
        debug!(%id, open = self.expanded.len(), "select");
    }

    pub fn set_depth_limit(&mut self, depth_limit: DepthLimit) {
        self.depth_limit = depth_limit;
    }

    /// Drop ids that no longer resolve after the directory was replaced.
    pub fn revalidate(&mut self, directory: &Directory) {
        let before = self.expanded.len();
        self.expanded.retain(|id| directory.contains(*id));
        if self.selected.is_some_and(|id| !directory.contains(id)) {
            self.selected = None;
        }
        let dropped = before - self.expanded.len();
        if dropped > 0 {
            debug!(dropped, "stale expanded ids removed");
        }
    }
}
