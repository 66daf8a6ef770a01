pub mod controller;
pub mod layout;
pub mod manager;
pub mod pane;
pub mod ratios;
pub mod store;

pub use controller::{Divider, LayoutController, MIN_PANE_WIDTH, PointerCapture};
pub use layout::{ProblemLayout, Rect};
pub use manager::{PaneManager, PressOutcome};
pub use pane::PaneKind;
pub use store::PaneRatioStore;
