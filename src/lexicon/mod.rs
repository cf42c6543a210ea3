pub mod matcher;
pub mod store;

pub use matcher::{find_matches, MatcherConfig};
pub use store::{expand_variants, LexiconStore};
