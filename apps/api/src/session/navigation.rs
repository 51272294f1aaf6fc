//! Category Navigation Controller: "jump to category" over the rendered sections.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::report::CategoryKey;

/// A presentation region that can be brought into view.
pub trait ScrollTarget {
    fn scroll_into_view(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryState {
    Empty,
    Populated,
}

/// Registry of category key → on-screen region, scoped to one presentation session.
#[derive(Debug)]
pub struct NavigationController<H> {
    targets: HashMap<CategoryKey, H>,
}

impl<H> Default for NavigationController<H> {
    fn default() -> Self {
        Self {
            targets: HashMap::new(),
        }
    }
}

impl<H: ScrollTarget> NavigationController<H> {
    /// Registers the region for `key`. The last registration wins; the replaced
    /// handle is returned.
    pub fn register(&mut self, key: CategoryKey, handle: H) -> Option<H> {
        self.targets.insert(key, handle)
    }

    /// Scrolls to the region registered for `key` and returns it. A key with no
    /// registered region is a no-op and returns `None`.
    pub fn scroll_to(&self, key: CategoryKey) -> Option<&H> {
        let Some(handle) = self.targets.get(&key) else {
            debug!(category = %key, "no region registered, ignoring scroll");
            return None;
        };
        handle.scroll_into_view();
        Some(handle)
    }

    /// Drops every registration. Call whenever the view being presented is replaced.
    pub fn unregister_all(&mut self) {
        self.targets.clear();
    }

    pub fn state(&self) -> RegistryState {
        if self.is_empty() {
            RegistryState::Empty
        } else {
            RegistryState::Populated
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
