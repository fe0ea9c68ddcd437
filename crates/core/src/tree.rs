//! Visible-node resolution for the org chart.
//!
//! The chart never stores rendered nodes. Every state change re-runs
//! [`resolve`], which walks the directory from the chosen root in pre-order
//! and decides per node whether its reports are shown.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::model::{Directory, Employee, EmployeeId};

/// Which employee the chart is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootSelector {
    /// The top of the organization.
    #[default]
    All,
    Employee(EmployeeId),
}

impl RootSelector {
    pub fn resolve<'a>(&self, directory: &'a Directory) -> Option<&'a Employee> {
        match self {
            RootSelector::All => directory.root(),
            RootSelector::Employee(id) => directory.get(*id),
        }
    }
}

impl FromStr for RootSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(RootSelector::All);
        }
        s.parse::<u32>()
            .map(|id| RootSelector::Employee(EmployeeId(id)))
            .map_err(|_| format!("expected \"all\" or an employee id, got {s:?}"))
    }
}

/// How many generations below an expanded node are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthLimit {
    Limited(u32),
    Unlimited,
}

impl Default for DepthLimit {
    fn default() -> Self {
        DepthLimit::Limited(1)
    }
}

impl DepthLimit {
    /// Whether a node at `depth` may show its reports.
    pub fn allows_children(&self, depth: u32) -> bool {
        match self {
            DepthLimit::Limited(n) => depth < *n,
            DepthLimit::Unlimited => true,
        }
    }
}

impl fmt::Display for DepthLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepthLimit::Limited(n) => write!(f, "{n}"),
            DepthLimit::Unlimited => write!(f, "all"),
        }
    }
}

impl FromStr for DepthLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("unlimited") {
            return Ok(DepthLimit::Unlimited);
        }
        s.parse::<u32>()
            .map(DepthLimit::Limited)
            .map_err(|_| format!("expected \"all\" or a depth, got {s:?}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleNode<'a> {
    pub employee: &'a Employee,
    pub depth: u32,
    pub has_hidden_children: bool,
}

impl VisibleNode<'_> {
    pub fn id(&self) -> EmployeeId {
        self.employee.id
    }
}

/// Lazy pre-order walk over the visible part of the chart.
///
/// Clone before consuming to replay the same sequence.
#[derive(Debug, Clone)]
pub struct VisibleNodes<'a> {
    directory: &'a Directory,
    expanded: &'a BTreeSet<EmployeeId>,
    depth_limit: DepthLimit,
    stack: Vec<(&'a Employee, u32)>,
    emitted: HashSet<EmployeeId>,
}

impl<'a> Iterator for VisibleNodes<'a> {
    type Item = VisibleNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (employee, depth) = self.stack.pop()?;
            // A looping reports_to chain would otherwise revisit nodes forever.
            if !self.emitted.insert(employee.id) {
                continue;
            }

            let open = self.expanded.contains(&employee.id);
            let within = self.depth_limit.allows_children(depth);
            if open && within {
                let mut children: Vec<&'a Employee> = self.directory.children(employee.id).collect();
                children.reverse();
                self.stack.extend(children.into_iter().map(|c| (c, depth + 1)));
            }

            return Some(VisibleNode {
                employee,
                depth,
                has_hidden_children: employee.has_reports() && !(open && within),
            });
        }
    }
}

/// Nodes to render for the given root, depth limit and expansion set.
///
/// An unresolvable root (including a directory with nobody at the top)
/// yields an empty sequence.
pub fn resolve<'a>(
    directory: &'a Directory,
    root: RootSelector,
    depth_limit: DepthLimit,
    expanded: &'a BTreeSet<EmployeeId>,
) -> VisibleNodes<'a> {
    let stack = root
        .resolve(directory)
        .map(|e| vec![(e, 0)])
        .unwrap_or_default();
    VisibleNodes {
        directory,
        expanded,
        depth_limit,
        stack,
        emitted: HashSet::new(),
    }
}
