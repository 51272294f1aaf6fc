use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::report::{AnalysisView, CategoryKey};
use crate::session::navigation::{NavigationController, ScrollTarget};

/// Element id of a rendered category section. The server-side scroll target:
/// "scrolling" hands the anchor back to the client that owns the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub element_id: String,
}

impl ScrollTarget for Anchor {
    fn scroll_into_view(&self) {
        debug!(element_id = %self.element_id, "scrolling to anchor");
    }
}

/// One user's presentation state: the current view, if any, and its navigation registry.
#[derive(Debug)]
pub struct PresentationSession<H> {
    view: Option<AnalysisView>,
    navigation: NavigationController<H>,
}

impl<H> Default for PresentationSession<H> {
    fn default() -> Self {
        Self {
            view: None,
            navigation: NavigationController::default(),
        }
    }
}

impl<H: ScrollTarget> PresentationSession<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever was shown with an already-normalized view; `None` is the
    /// "no result" state. Registrations made for the previous view are always dropped.
    pub fn install(&mut self, view: Option<AnalysisView>) -> Option<&AnalysisView> {
        self.navigation.unregister_all();
        self.view = view;
        self.view.as_ref()
    }

    pub fn view(&self) -> Option<&AnalysisView> {
        self.view.as_ref()
    }

    pub fn register(&mut self, key: CategoryKey, handle: H) -> Option<H> {
        self.navigation.register(key, handle)
    }

    pub fn scroll_to(&self, key: CategoryKey) -> Option<&H> {
        self.navigation.scroll_to(key)
    }

    pub fn unregister_all(&mut self) {
        self.navigation.unregister_all();
    }

    pub fn navigation(&self) -> &NavigationController<H> {
        &self.navigation
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;
    use crate::session::navigation::tests::{recorder, Recorder};
    use crate::session::navigation::RegistryState;

    use crate::report::{normalize_report, RawReport};

    fn normalized(value: serde_json::Value) -> Option<AnalysisView> {
        normalize_report(RawReport::from_value(&value))
    }

    #[test]
    fn test_starts_without_result() {
        let session: PresentationSession<Recorder> = PresentationSession::new();
        assert!(session.view().is_none());
        assert_eq!(session.navigation().state(), RegistryState::Empty);
    }

    #[test]
    fn test_install_sets_view() {
        let mut session: PresentationSession<Recorder> = PresentationSession::new();
        let view = session
            .install(normalized(json!({"ai_feedback": {"overall_score": 77}})))
            .unwrap();
        assert_eq!(view.overall_score, 77.0);
        assert!(session.view().is_some());
    }

    #[test]
    fn test_new_report_clears_registrations() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut session = PresentationSession::new();
        session.install(normalized(json!({
            "ai_feedback": {"feedback_by_category": {"ats": {"issues": ["no keywords"]}}}
        })));
        session.register(CategoryKey::Ats, recorder("ats", &log));

        session.install(normalized(json!({"ai_feedback": {"overall_score": 40}})));
        assert_eq!(session.navigation().state(), RegistryState::Empty);
        assert!(session.scroll_to(CategoryKey::Ats).is_none());
        assert!(log.borrow().is_empty());
        assert_eq!(session.view().unwrap().overall_score, 40.0);
    }

    #[test]
    fn test_report_without_feedback_discards_previous_view() {
        let mut session: PresentationSession<Recorder> = PresentationSession::new();
        session.install(normalized(json!({"ai_feedback": {}})));
        assert!(session.install(normalized(json!({"pages_detected": 1}))).is_none());
        assert!(session.view().is_none());
    }

    #[test]
    fn test_register_navigable_categories() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut session = PresentationSession::new();
        let keys = session
            .install(normalized(json!({
                "ai_feedback": {"feedback_by_category": {
                    "ats": {"issues": ["x"]},
                    "structure": {"strengths": ["y"]}
                }}
            })))
            .unwrap()
            .category_feedback
            .navigable
            .clone();
        assert_eq!(keys, vec![CategoryKey::Structure, CategoryKey::Ats]);

        for key in keys {
            session.register(key, recorder(key.as_str(), &log));
        }
        session.scroll_to(CategoryKey::Structure);
        session.scroll_to(CategoryKey::Impact);
        assert_eq!(*log.borrow(), vec!["structure"]);
    }

    #[test]
    fn test_anchor_scroll_returns_anchor() {
        let mut session = PresentationSession::new();
        session.register(
            CategoryKey::Clarity,
            Anchor {
                element_id: "category-clarity".to_string(),
            },
        );
        let anchor = session.scroll_to(CategoryKey::Clarity).unwrap();
        assert_eq!(anchor.element_id, "category-clarity");
        session.unregister_all();
        assert!(session.scroll_to(CategoryKey::Clarity).is_none());
    }
}
