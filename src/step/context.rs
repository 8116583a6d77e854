//! Step invocation context and capture handling.

/// Name of a capturing group inside a step-definition pattern.
pub type CaptureName = Option<String>;

/// Context of a single step invocation, handed to the action next to the
/// scenario's context handle.
#[derive(Clone, Debug)]
pub struct Context {
    /// Step line matched to the definition.
    pub line: String,

    /// Capture groups extracted from the matched [`line`], in pattern order,
    /// the whole-line group excluded.
    ///
    /// [`line`]: Context::line
    pub matches: Vec<(CaptureName, String)>,
}

impl Context {
    /// Creates a new [`Context`] with the given step line and matches.
    #[must_use]
    pub fn new(
        line: impl Into<String>,
        matches: Vec<(CaptureName, String)>,
    ) -> Self {
        Self { line: line.into(), matches }
    }

    /// Returns the matched step line.
    #[must_use]
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Returns all the extracted capture groups.
    #[must_use]
    pub fn matches(&self) -> &[(CaptureName, String)] {
        &self.matches
    }

    /// Returns the value of a capture group by its index, with `0` being the
    /// first capture group of the pattern.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.matches.get(index).map(|(_, value)| value.as_str())
    }

    /// Returns the value of a named capture group, if present.
    #[must_use]
    pub fn named_arg(&self, name: &str) -> Option<&str> {
        self.matches
            .iter()
            .find(|(capture_name, _)| capture_name.as_deref() == Some(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns an [`Iterator`] over the capture group values, in pattern
    /// order.
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.matches.iter().map(|(_, value)| value.as_str())
    }
}
