//! Compilation and matching of step-definition patterns.

use derive_more::with_trait::{Deref, Display, Error};
use regex::Regex;

use crate::step::CaptureName;

/// Compiled [`Regex`] pattern of a step definition, anchored to a whole step
/// line.
///
/// Displays as the original pattern text it was registered with.
#[derive(Clone, Debug, Deref, Display)]
#[display("{source}")]
pub struct StepPattern {
    /// Pattern text, as it was registered.
    source: String,

    /// Compiled anchored [`Regex`].
    #[deref]
    regex: Regex,
}

impl StepPattern {
    /// Compiles the given `pattern` text into a [`StepPattern`].
    ///
    /// The `pattern` is always wrapped into a non-capturing `^(?:...)$`
    /// group, so it can only ever match a whole step line, even when it
    /// contains a top-level alternation or an escaped `\$`. Anchors are
    /// zero-width, so explicitly anchored patterns keep their meaning, and
    /// capture group indices are never shifted by the wrapping.
    ///
    /// # Errors
    ///
    /// If the given `pattern` is not a valid regular expression.
    pub fn compile(pattern: &str) -> Result<Self, InvalidPattern> {
        Regex::new(&format!("^(?:{pattern})$"))
            .map(|regex| Self { source: pattern.to_owned(), regex })
            .map_err(|source| InvalidPattern {
                pattern: pattern.to_owned(),
                source,
            })
    }

    /// Returns the pattern text, as it was registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Matches the given step `line` against this pattern.
    ///
    /// Returns the captured groups (the whole-line group `0` excluded), in
    /// pattern order, if the whole `line` matches. Optional groups not
    /// participating in the match capture the empty string.
    #[must_use]
    pub fn match_line(&self, line: &str) -> Option<Vec<(CaptureName, String)>> {
        let captures = self.regex.captures(line)?;

        Some(
            self.regex
                .capture_names()
                .zip(captures.iter())
                .skip(1)
                .map(|(name, group)| {
                    (
                        name.map(str::to_owned),
                        group.map_or_else(String::new, |m| {
                            m.as_str().to_owned()
                        }),
                    )
                })
                .collect(),
        )
    }
}

impl PartialEq for StepPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for StepPattern {}

/// Error of a step-definition pattern not being a valid [`Regex`].
#[derive(Clone, Debug, Display, Error)]
#[display("`{pattern}` is not a valid regular expression: {source}")]
pub struct InvalidPattern {
    /// Pattern text that failed to compile.
    pub pattern: String,

    /// Underlying [`Regex`] compilation error.
    pub source: regex::Error,
}
