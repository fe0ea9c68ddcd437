use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::config::ChartConfig;
use crate::model::{Directory, Employee, EmployeeId};
use crate::state::TreeViewState;
use crate::tree::{resolve, DepthLimit, RootSelector, VisibleNodes};
use crate::viewport::Viewport;

/// Input events a front end can feed into [`OrgChart::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ChartEvent {
    Click { id: EmployeeId },
    ToggleExpand { id: EmployeeId },
    JumpTo { id: EmployeeId },
    GoUp,
    SetDepth { limit: DepthLimit },
    ZoomIn,
    ZoomOut,
    Pan { x: f32, y: f32 },
}

/// The interactive org chart: directory, tree state and viewport together.
#[derive(Debug, Clone)]
pub struct OrgChart {
    directory: Directory,
    root: RootSelector,
    state: TreeViewState,
    viewport: Viewport,
}

impl OrgChart {
    pub fn new(directory: Directory) -> Self {
        Self::with_config(directory, &ChartConfig::default())
    }

    pub fn with_config(directory: Directory, config: &ChartConfig) -> Self {
        log_issues(&directory);
        let state = TreeViewState::with_depth_limit(&directory, config.depth_limit);
        Self {
            directory,
            root: config.root,
            state,
            viewport: Viewport::new(config.viewport),
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn root(&self) -> RootSelector {
        self.root
    }

    pub fn set_root(&mut self, root: RootSelector) {
        self.root = root;
    }

    pub fn state(&self) -> &TreeViewState {
        &self.state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn expanded(&self) -> &BTreeSet<EmployeeId> {
        self.state.expanded()
    }

    pub fn selected(&self) -> Option<EmployeeId> {
        self.state.selected()
    }

    pub fn selected_employee(&self) -> Option<&Employee> {
        self.state.selected().and_then(|id| self.directory.get(id))
    }

    /// Render sequence for the current state.
    pub fn visible(&self) -> VisibleNodes<'_> {
        resolve(
            &self.directory,
            self.root,
            self.state.depth_limit(),
            self.state.expanded(),
        )
    }

    pub fn click(&mut self, id: EmployeeId) {
        self.state.click(&self.directory, id);
    }

    pub fn toggle_expand(&mut self, id: EmployeeId) {
        self.state.toggle(id);
    }

    /// Locate an employee: open the path to it, select it and move the view
    /// to the jump anchor.
    pub fn jump_to(&mut self, id: EmployeeId) {
        if !self.directory.contains(id) {
            debug!(%id, "jump to unknown employee ignored");
            return;
        }
        self.state.click(&self.directory, id);
        self.viewport.reset_to_anchor();
    }

    /// Jump to the selected employee's manager, if there is one.
    pub fn go_up(&mut self) {
        let manager = self
            .selected_employee()
            .and_then(|e| e.reports_to)
            .filter(|m| self.directory.contains(*m));
        if let Some(manager) = manager {
            self.jump_to(manager);
        }
    }

    pub fn set_depth(&mut self, limit: DepthLimit) {
        self.state.set_depth_limit(limit);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.viewport.set_zoom(zoom);
    }

    pub fn pan(&mut self, x: f32, y: f32) {
        self.viewport.set_pan(x, y);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.viewport.pan_by(dx, dy);
    }

    pub fn center_on_mount(&mut self, container_width: f32) {
        self.viewport.center_on_mount(container_width);
    }

    /// Swap in a new employee list and forget ids it no longer contains.
    pub fn replace_directory(&mut self, directory: Directory) {
        log_issues(&directory);
        self.directory = directory;
        self.state.revalidate(&self.directory);
    }

    pub fn apply(&mut self, event: ChartEvent) {
        match event {
            ChartEvent::Click { id } => self.click(id),
            ChartEvent::ToggleExpand { id } => self.toggle_expand(id),
            ChartEvent::JumpTo { id } => self.jump_to(id),
            ChartEvent::GoUp => self.go_up(),
            ChartEvent::SetDepth { limit } => self.set_depth(limit),
            ChartEvent::ZoomIn => self.zoom_in(),
            ChartEvent::ZoomOut => self.zoom_out(),
            ChartEvent::Pan { x, y } => self.pan(x, y),
        }
    }
}

fn log_issues(directory: &Directory) {
    for issue in directory.validate() {
        warn!(%issue, "employee directory");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> OrgChart {
        OrgChart::new(Directory::new(vec![
            Employee::new(1, "Root", None, 2),
            Employee::new(2, "Manager", Some(1), 1),
            Employee::new(3, "Peer", Some(1), 0),
            Employee::new(4, "Report", Some(2), 0),
        ]))
    }

    fn set(ids: &[u32]) -> BTreeSet<EmployeeId> {
        ids.iter().copied().map(EmployeeId).collect()
    }

    fn rendered(chart: &OrgChart) -> Vec<(u32, u32)> {
        chart.visible().map(|n| (n.id().0, n.depth)).collect()
    }

    #[test]
    fn click_then_unlimited_depth_renders_path() {
        let mut chart = scenario();
        assert_eq!(rendered(&chart), vec![(1, 0), (2, 1), (3, 1)]);

        chart.click(EmployeeId(4));
        assert_eq!(chart.selected(), Some(EmployeeId(4)));
        chart.set_depth(DepthLimit::Unlimited);
        assert_eq!(rendered(&chart), vec![(1, 0), (2, 1), (4, 2), (3, 1)]);
    }

    #[test]
    fn jump_resets_pan_and_keeps_zoom() {
        let mut chart = scenario();
        chart.zoom_in();
        chart.pan(700.0, -30.0);
        chart.jump_to(EmployeeId(2));
        assert_eq!(chart.viewport().pan(), (50.0, 100.0));
        assert_eq!(chart.selected(), Some(EmployeeId(2)));
        assert_eq!(chart.expanded(), &set(&[1, 2]));
        assert!((chart.viewport().zoom() - 1.1).abs() < 1e-6);
    }

    #[test]
    fn jump_to_unknown_changes_nothing() {
        let mut chart = scenario();
        chart.pan(5.0, 5.0);
        chart.jump_to(EmployeeId(40));
        assert_eq!(chart.viewport().pan(), (5.0, 5.0));
        assert_eq!(chart.selected(), None);
    }

    #[test]
    fn go_up_walks_to_manager() {
        let mut chart = scenario();
        chart.click(EmployeeId(4));
        chart.go_up();
        assert_eq!(chart.selected(), Some(EmployeeId(2)));
        assert_eq!(chart.viewport().pan(), (50.0, 100.0));
        chart.go_up();
        assert_eq!(chart.selected(), Some(EmployeeId(1)));
        assert_eq!(chart.expanded(), &set(&[1]));
    }

    #[test]
    fn go_up_at_root_or_without_selection_is_noop() {
        let mut chart = scenario();
        chart.go_up();
        assert_eq!(chart.selected(), None);
        assert_eq!(chart.viewport().pan(), (0.0, 0.0));

        chart.click(EmployeeId(1));
        chart.pan(1.0, 2.0);
        chart.go_up();
        assert_eq!(chart.selected(), Some(EmployeeId(1)));
        assert_eq!(chart.viewport().pan(), (1.0, 2.0));
    }

    #[test]
    fn go_up_with_dangling_manager_is_noop() {
        let mut chart = OrgChart::new(Directory::new(vec![
            Employee::new(1, "Root", None, 0),
            Employee::new(2, "Orphan", Some(9), 0),
        ]));
        chart.click(EmployeeId(2));
        chart.go_up();
        assert_eq!(chart.selected(), Some(EmployeeId(2)));
    }

    #[test]
    fn replacing_directory_drops_stale_selection() {
        let mut chart = scenario();
        chart.click(EmployeeId(4));
        chart.replace_directory(Directory::new(vec![
            Employee::new(1, "Root", None, 1),
            Employee::new(2, "Manager", Some(1), 0),
        ]));
        assert_eq!(chart.selected(), None);
        assert_eq!(chart.expanded(), &set(&[1, 2]));
        assert_eq!(rendered(&chart), vec![(1, 0), (2, 1)]);
    }

    #[test]
    fn events_deserialize_and_apply() {
        let script = r#"[
            {"event": "click", "id": 4},
            {"event": "setDepth", "limit": "unlimited"},
            {"event": "zoomIn"},
            {"event": "pan", "x": 10.0, "y": 20.0},
            {"event": "toggleExpand", "id": 2}
        ]"#;
        let events: Vec<ChartEvent> = serde_json::from_str(script).unwrap();
        let mut chart = scenario();
        for event in events {
            chart.apply(event);
        }
        assert_eq!(chart.selected(), Some(EmployeeId(4)));
        assert_eq!(chart.viewport().pan(), (10.0, 20.0));
        assert_eq!(rendered(&chart), vec![(1, 0), (2, 1), (3, 1)]);
    }

    #[test]
    fn explicit_root_from_config() {
        let config = ChartConfig {
            root: RootSelector::Employee(EmployeeId(2)),
            depth_limit: DepthLimit::Unlimited,
            ..ChartConfig::default()
        };
        let mut chart = OrgChart::with_config(scenario().directory().clone(), &config);
        assert_eq!(rendered(&chart), vec![(2, 0)]);
        chart.toggle_expand(EmployeeId(2));
        assert_eq!(rendered(&chart), vec![(2, 0), (4, 1)]);
    }
}
