pub mod terminal;

pub use terminal::truncate_chars;
