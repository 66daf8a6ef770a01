pub mod shortcuts;

pub use shortcuts::{ShortcutAction, ShortcutHandler};
