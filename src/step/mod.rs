// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step definitions: pattern-bound async actions over a scenario's context.

pub mod context;
pub mod error;
pub mod location;

use std::sync::Arc;

use derive_more::with_trait::Debug;
use futures::future::LocalBoxFuture;

use crate::pattern::StepPattern;

pub use self::{
    context::{CaptureName, Context},
    error::{AmbiguousMatch, Candidate},
    location::Location,
};

/// Alias for a step [`Definition`]'s action, executed over the scenario's
/// context handle.
pub type StepFn<W> = Arc<
    dyn for<'a> Fn(&'a mut W, Context) -> LocalBoxFuture<'a, ()>
        + Send
        + Sync,
>;

/// Single registered step definition.
///
/// Immutable once registered: lives for the whole run.
#[derive(Debug)]
pub struct Definition<W> {
    /// Compiled pattern the step line has to match.
    pattern: StepPattern,

    /// Inert annotation (`Given`/`When`/`Then` or anything else), shown in
    /// diagnostics and never participating in matching.
    label: Option<String>,

    /// Callsite this definition was registered at.
    location: Option<Location>,

    /// Action to invoke on a match.
    #[debug("{:p}", Arc::as_ptr(action))]
    action: StepFn<W>,
}

// Implemented manually to omit redundant `W: Clone` trait bound, imposed by
// `#[derive(Clone)]`.
impl<W> Clone for Definition<W> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            label: self.label.clone(),
            location: self.location,
            action: Arc::clone(&self.action),
        }
    }
}

impl<W> Definition<W> {
    /// Creates a new [`Definition`].
    pub(crate) fn new(
        pattern: StepPattern,
        label: Option<String>,
        location: Option<Location>,
        action: StepFn<W>,
    ) -> Self {
        Self { pattern, label, location, action }
    }

    /// Returns the pattern this [`Definition`] matches on.
    #[must_use]
    pub fn pattern(&self) -> &StepPattern {
        &self.pattern
    }

    /// Returns the label this [`Definition`] is annotated with.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the callsite this [`Definition`] was registered at.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Returns the action of this [`Definition`].
    #[must_use]
    pub fn action(&self) -> &StepFn<W> {
        &self.action
    }
}
