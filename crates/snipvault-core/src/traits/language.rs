//! Language heuristic collaborator.

use std::fmt;

/// Produces a best-guess language tag for raw snippet text.
///
/// Consulted only when a snippet is created or its content updated without
/// an explicit language.
pub trait LanguageDetector: Send + Sync + fmt::Debug + 'static {
    /// Return a short language tag such as `"rust"` or `"plaintext"`.
    fn detect(&self, content: &str) -> String;
}
