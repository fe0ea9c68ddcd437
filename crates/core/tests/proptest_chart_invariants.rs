//! Property-based invariant tests for the org chart core.
//!
//! 1. A well-formed directory always renders its root first at depth 0.
//! 2. Click opens exactly the ancestor path (plus the node if it manages anyone).
//! 3. No rendered node is deeper than a finite depth limit.
//! 4. Toggling twice restores the expansion set.
//! 5. Zoom stays within its bounds.
//! 6. Malformed directories never panic and render a bounded sequence.

use orgchart_core::{
    resolve, ChartEvent, DepthLimit, Directory, Employee, EmployeeId, OrgChart, RootSelector,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Well-formed tree: employee `i` (1-based) reports to some earlier employee.
fn tree_strategy() -> impl Strategy<Value = Directory> {
    (1usize..40)
        .prop_flat_map(|n| {
            let parents: Vec<BoxedStrategy<Option<u32>>> = (0..n)
                .map(|i| {
                    if i == 0 {
                        Just(None).boxed()
                    } else {
                        (1..=i as u32).prop_map(Some).boxed()
                    }
                })
                .collect();
            parents
        })
        .prop_map(|parents| build(&parents))
}

/// Arbitrary `reports_to` values, including dangling ids, cycles and
/// several or no top-level employees.
fn malformed_strategy() -> impl Strategy<Value = Directory> {
    prop::collection::vec(prop::option::of(1u32..50), 0..40).prop_map(|parents| build(&parents))
}

fn build(parents: &[Option<u32>]) -> Directory {
    let employees = parents
        .iter()
        .enumerate()
        .map(|(i, parent)| {
            let id = i as u32 + 1;
            let reports = parents.iter().filter(|p| **p == Some(id)).count() as u32;
            Employee::new(id, format!("Employee {id}"), *parent, reports)
        })
        .collect();
    Directory::new(employees)
}

fn depth_strategy() -> impl Strategy<Value = DepthLimit> {
    prop_oneof![(0u32..6).prop_map(DepthLimit::Limited), Just(DepthLimit::Unlimited)]
}

fn event_strategy() -> impl Strategy<Value = ChartEvent> {
    let id = (0u32..45).prop_map(EmployeeId);
    prop_oneof![
        id.clone().prop_map(|id| ChartEvent::Click { id }),
        id.clone().prop_map(|id| ChartEvent::ToggleExpand { id }),
        id.prop_map(|id| ChartEvent::JumpTo { id }),
        Just(ChartEvent::GoUp),
        depth_strategy().prop_map(|limit| ChartEvent::SetDepth { limit }),
        Just(ChartEvent::ZoomIn),
        Just(ChartEvent::ZoomOut),
        (-1e4f32..1e4, -1e4f32..1e4).prop_map(|(x, y)| ChartEvent::Pan { x, y }),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Root first
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn root_renders_first(dir in tree_strategy(), depth in depth_strategy(),
                          events in prop::collection::vec(event_strategy(), 0..20)) {
        let mut chart = OrgChart::new(dir);
        chart.set_depth(depth);
        for event in events {
            chart.apply(event);
        }
        let first = chart.visible().next();
        prop_assert!(first.is_some());
        let first = first.unwrap();
        prop_assert_eq!(first.id(), EmployeeId(1));
        prop_assert_eq!(first.depth, 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Accordion exclusivity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn click_opens_only_the_path(dir in tree_strategy(), pick in any::<prop::sample::Index>(),
                                 events in prop::collection::vec(event_strategy(), 0..10)) {
        let target = dir.employees()[pick.index(dir.len())].id;
        let mut expected: BTreeSet<EmployeeId> = dir.ancestors(target).into_iter().collect();
        if dir.get(target).is_some_and(|e| e.direct_reports > 0) {
            expected.insert(target);
        }

        let mut chart = OrgChart::new(dir);
        for event in events {
            chart.apply(event);
        }
        chart.click(target);
        prop_assert_eq!(chart.expanded(), &expected);
        prop_assert_eq!(chart.selected(), Some(target));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Depth bound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn depth_never_exceeds_limit(dir in tree_strategy(), limit in 0u32..6,
                                 open in prop::collection::btree_set(1u32..40, 0..40)) {
        let expanded: BTreeSet<EmployeeId> = open.into_iter().map(EmployeeId).collect();
        for node in resolve(&dir, RootSelector::All, DepthLimit::Limited(limit), &expanded) {
            prop_assert!(node.depth <= limit);
            if node.depth == limit {
                prop_assert_eq!(node.has_hidden_children, node.employee.direct_reports > 0);
            }
        }
    }

    #[test]
    fn full_expansion_renders_everyone(dir in tree_strategy()) {
        let expanded: BTreeSet<EmployeeId> = dir.employees().iter().map(|e| e.id).collect();
        let nodes: Vec<_> = resolve(&dir, RootSelector::All, DepthLimit::Unlimited, &expanded).collect();
        prop_assert_eq!(nodes.len(), dir.len());
        prop_assert!(nodes.iter().all(|n| !n.has_hidden_children));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Toggle is an involution
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn double_toggle_restores(dir in tree_strategy(), id in 0u32..45,
                              events in prop::collection::vec(event_strategy(), 0..10)) {
        let mut chart = OrgChart::new(dir);
        for event in events {
            chart.apply(event);
        }
        let before = chart.expanded().clone();
        let selected = chart.selected();
        chart.toggle_expand(EmployeeId(id));
        chart.toggle_expand(EmployeeId(id));
        prop_assert_eq!(chart.expanded(), &before);
        prop_assert_eq!(chart.selected(), selected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Zoom clamping
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn zoom_stays_in_bounds(steps in prop::collection::vec(any::<bool>(), 0..80)) {
        let mut chart = OrgChart::new(Directory::sample());
        for zoom_in in steps {
            if zoom_in { chart.zoom_in() } else { chart.zoom_out() }
            let zoom = chart.viewport().zoom();
            prop_assert!((0.5..=2.0).contains(&zoom), "zoom out of range: {}", zoom);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Graceful degradation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn malformed_directories_render_bounded(dir in malformed_strategy(), depth in depth_strategy(),
                                            events in prop::collection::vec(event_strategy(), 0..20)) {
        let len = dir.len();
        let root = dir.root().map(|e| e.id);
        let mut chart = OrgChart::new(dir);
        chart.set_depth(depth);
        for event in events {
            chart.apply(event);
            let nodes: Vec<_> = chart.visible().collect();
            prop_assert!(nodes.len() <= len);
            match root {
                Some(root) => prop_assert_eq!(nodes.first().map(|n| n.id()), Some(root)),
                None => prop_assert!(nodes.is_empty()),
            }
            let selected = chart.selected();
            prop_assert!(selected.map_or(true, |id| chart.directory().contains(id)));
        }
    }
}

// ── Worked example ──────────────────────────────────────────────────────

#[test]
fn documented_scenario() {
    let dir = Directory::new(vec![
        Employee::new(1, "CEO", None, 2),
        Employee::new(2, "VP", Some(1), 1),
        Employee::new(3, "Director", Some(1), 0),
        Employee::new(4, "Engineer", Some(2), 0),
    ]);
    let mut chart = OrgChart::new(dir);

    let initial: Vec<(u32, u32, bool)> = chart
        .visible()
        .map(|n| (n.id().0, n.depth, n.has_hidden_children))
        .collect();
    assert_eq!(initial, vec![(1, 0, false), (2, 1, true), (3, 1, false)]);

    chart.click(EmployeeId(4));
    assert_eq!(
        chart.expanded(),
        &[EmployeeId(1), EmployeeId(2)].into_iter().collect::<BTreeSet<_>>()
    );
    assert_eq!(chart.selected(), Some(EmployeeId(4)));

    chart.set_depth(DepthLimit::Limited(2));
    let after: Vec<(u32, u32)> = chart.visible().map(|n| (n.id().0, n.depth)).collect();
    assert_eq!(after, vec![(1, 0), (2, 1), (4, 2), (3, 1)]);
}
