//! Errors of matching a step line against registered definitions.

use std::fmt;

use derive_more::with_trait::Error;

use super::{location::Location, Definition};

/// Error of a step line matching multiple registered [`Definition`]s.
#[derive(Clone, Debug, Error)]
pub struct AmbiguousMatch {
    /// Candidates the step line matches, in registration order.
    #[error(not(source))]
    pub possible_matches: Vec<Candidate>,
}

impl fmt::Display for AmbiguousMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Possible matches:")?;
        for candidate in &self.possible_matches {
            write!(f, "\n{candidate}")?;
        }
        Ok(())
    }
}

/// Single candidate of an [`AmbiguousMatch`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Candidate {
    /// Pattern of the candidate [`Definition`], as it was registered.
    pub pattern: String,

    /// Label of the candidate [`Definition`], if any.
    pub label: Option<String>,

    /// Callsite the candidate [`Definition`] was registered at.
    pub location: Option<Location>,
}

impl<W> From<&Definition<W>> for Candidate {
    fn from(definition: &Definition<W>) -> Self {
        Self {
            pattern: definition.pattern().as_str().to_owned(),
            label: definition.label().map(str::to_owned),
            location: definition.location(),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "{label} ")?;
        }
        write!(f, "{}", self.pattern)?;
        if let Some(loc) = &self.location {
            write!(f, " --> {loc}")?;
        }
        Ok(())
    }
}
