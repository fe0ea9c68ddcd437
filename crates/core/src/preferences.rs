//! Shared navigation-width preference.
//!
//! Several regions of the UI depend on whether the side navigation is
//! expanded. Instead of each region re-reading stored state on a timer, the
//! owner publishes changes through a [`PreferenceHub`] and every interested
//! region holds a subscription.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::ConfigError;

pub const NAV_EXPANDED_WIDTH: f32 = 240.0;
pub const NAV_COLLAPSED_WIDTH: f32 = 120.0;
/// Container widths below this count as tablet layout.
pub const TABLET_BREAKPOINT: f32 = 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NavPreference {
    pub expanded: bool,
    #[serde(skip)]
    pub tablet: bool,
}

impl NavPreference {
    /// Tablet layouts always use the collapsed navigation.
    pub fn effective_width(&self) -> f32 {
        if self.expanded && !self.tablet {
            NAV_EXPANDED_WIDTH
        } else {
            NAV_COLLAPSED_WIDTH
        }
    }

    pub fn with_viewport_width(self, width: f32) -> Self {
        Self {
            tablet: width < TABLET_BREAKPOINT,
            ..self
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string(self)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

struct HubInner {
    current: NavPreference,
    subscribers: Vec<Sender<NavPreference>>,
}

/// Current preference plus the channels of everyone watching it.
pub struct PreferenceHub {
    inner: Mutex<HubInner>,
}

impl Default for PreferenceHub {
    fn default() -> Self {
        Self::new(NavPreference::default())
    }
}

impl PreferenceHub {
    pub fn new(initial: NavPreference) -> Self {
        Self {
            inner: Mutex::new(HubInner {
                current: initial,
                subscribers: Vec::new(),
            }),
        }
    }

    pub fn current(&self) -> NavPreference {
        self.inner.lock().current
    }

    /// New receiver, primed with the current value.
    pub fn subscribe(&self) -> Receiver<NavPreference> {
        let (tx, rx) = unbounded();
        let mut inner = self.inner.lock();
        let _ = tx.send(inner.current);
        inner.subscribers.push(tx);
        rx
    }

    /// Store `value` and notify subscribers if it changed. Subscribers whose
    /// receiver was dropped are forgotten.
    pub fn publish(&self, value: NavPreference) -> bool {
        let mut inner = self.inner.lock();
        if inner.current == value {
            return false;
        }
        inner.current = value;
        inner.subscribers.retain(|tx| tx.send(value).is_ok());
        debug!(expanded = value.expanded, tablet = value.tablet, listeners = inner.subscribers.len(), "nav preference");
        true
    }

    pub fn update(&self, f: impl FnOnce(NavPreference) -> NavPreference) -> bool {
        let next = f(self.current());
        self.publish(next)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        let mut pref = NavPreference::default();
        assert_eq!(pref.effective_width(), 120.0);
        pref.expanded = true;
        assert_eq!(pref.effective_width(), 240.0);
        assert_eq!(pref.with_viewport_width(900.0).effective_width(), 120.0);
        assert_eq!(pref.with_viewport_width(1280.0).effective_width(), 240.0);
    }

    #[test]
    fn subscribers_get_current_then_changes() {
        let hub = PreferenceHub::default();
        let rx = hub.subscribe();
        assert_eq!(rx.try_recv().unwrap(), NavPreference::default());

        let expanded = NavPreference { expanded: true, tablet: false };
        assert!(hub.publish(expanded));
        assert_eq!(rx.try_recv().unwrap(), expanded);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unchanged_value_is_not_sent() {
        let hub = PreferenceHub::default();
        let rx = hub.subscribe();
        let _ = rx.try_recv();
        assert!(!hub.publish(NavPreference::default()));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let hub = PreferenceHub::default();
        let keep = hub.subscribe();
        drop(hub.subscribe());
        assert_eq!(hub.subscriber_count(), 2);
        hub.update(|p| NavPreference { expanded: !p.expanded, ..p });
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(keep.iter().take(2).last().map(|p| p.expanded), Some(true));
    }

    #[test]
    fn delivers_across_threads() {
        let hub = std::sync::Arc::new(PreferenceHub::default());
        let rx = hub.subscribe();
        let publisher = hub.clone();
        std::thread::spawn(move || {
            publisher.publish(NavPreference { expanded: true, tablet: false });
        })
        .join()
        .unwrap();
        let seen: Vec<bool> = rx.try_iter().map(|p| p.expanded).collect();
        assert_eq!(seen, vec![false, true]);
    }

    #[test]
    fn persists_expanded_flag_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nav.json");
        NavPreference { expanded: true, tablet: true }.save(&path).unwrap();
        assert_eq!(
            NavPreference::load(&path).unwrap(),
            NavPreference { expanded: true, tablet: false }
        );
    }
}
