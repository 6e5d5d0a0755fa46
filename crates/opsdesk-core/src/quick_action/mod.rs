//! Quick Action domain module.

mod model;

// Re-export public API
pub use model::{QuickAction, QuickActionOutcome};
