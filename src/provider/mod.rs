pub mod openai;
pub mod traits;

pub use openai::OpenAiModerationProvider;
pub use traits::ModerationProvider;
