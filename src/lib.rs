// Palisade: local content moderation for a personal-site assistant.
//
// This is the library root. Each module corresponds to a layer of the
// moderation pipeline: text normalization and script detection, lexicon
// data, the local rule engine, decision fusion, and the external
// moderation provider boundary.

pub mod classify;
pub mod config;
pub mod fusion;
pub mod lexicon;
pub mod output;
pub mod provider;
pub mod text;
