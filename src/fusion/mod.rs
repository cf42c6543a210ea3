pub mod fuse;
pub mod label;

pub use fuse::{fuse, ModerationDecision, ModerationOutcome};
pub use label::{normalize_label, ModerationLabel};
