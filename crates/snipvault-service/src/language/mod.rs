//! Language heuristic used when a snippet arrives without a language tag.

pub mod keyword;

pub use keyword::KeywordLanguageDetector;
