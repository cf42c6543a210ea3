pub mod normalize;
pub mod script;

pub use normalize::normalize;
pub use script::{select_languages, Language};
