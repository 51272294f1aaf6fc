// Presentation sessions: one current AnalysisView per session plus the
// "jump to category" registry that must be reset whenever that view is replaced.

pub mod handlers;
pub mod navigation;
pub mod presentation;
pub mod store;

pub use presentation::{Anchor, PresentationSession};
pub use store::SessionStore;
