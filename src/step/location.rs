//! Callsite tracking for step and hook definitions.

use derive_more::with_trait::Display;

/// Location of a definition's registration callsite, filled automatically
/// via [`track_caller`].
///
/// [`track_caller`]: https://doc.rust-lang.org/reference/attributes/codegen.html#the-track_caller-attribute
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{path}:{line}:{column}")]
pub struct Location {
    /// Path to the file the definition is registered in.
    pub path: &'static str,

    /// Line of the file the definition is registered at.
    pub line: u32,

    /// Column of the file the definition is registered at.
    pub column: u32,
}

impl Location {
    /// Creates a new [`Location`] with the given path, line and column.
    #[must_use]
    pub const fn new(path: &'static str, line: u32, column: u32) -> Self {
        Self { path, line, column }
    }

    /// Creates a new [`Location`] pointing at the caller of the current
    /// function.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let loc = std::panic::Location::caller();
        Self::new(loc.file(), loc.line(), loc.column())
    }
}
