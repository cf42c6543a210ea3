pub mod classifier;
pub mod patterns;
pub mod result;

pub use classifier::LocalClassifier;
pub use result::{LocalModerationResult, Reason};
