// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Loading of definitions from ordered sources into a [`Registry`].

use derive_more::with_trait::Debug;
use futures::future::LocalBoxFuture;

use crate::{
    hook::HookKind,
    pattern::InvalidPattern,
    registry::Registry,
    step,
    tagexpr::{self, TagFilter},
};

/// Alias for a deferred source of step definitions.
type StepSource<W> = Box<dyn for<'reg> FnOnce(Steps<'reg, W>) -> crate::Result<()>>;

/// Alias for a deferred source of hook definitions.
type HookSource<W> = Box<dyn for<'reg> FnOnce(Hooks<'reg, W>) -> crate::Result<()>>;

/// Builder of a [`Registry`] out of ordered definition sources.
///
/// Sources are closures receiving a registration handle ([`Steps`] or
/// [`Hooks`]), typically one per definitions file discovered by the
/// embedding runner. [`Loader::load()`] runs all step sources first, then
/// all hook sources, each group in the order the sources were added,
/// aborting on the first failed source.
#[derive(Debug)]
pub struct Loader<W> {
    /// Sources of step definitions, in addition order.
    #[debug("{}", steps.len())]
    steps: Vec<StepSource<W>>,

    /// Sources of hook definitions, in addition order.
    #[debug("{}", hooks.len())]
    hooks: Vec<HookSource<W>>,
}

// Implemented manually to omit redundant `W: Default` trait bound, imposed
// by `#[derive(Default)]`.
impl<W> Default for Loader<W> {
    fn default() -> Self {
        Self { steps: Vec::new(), hooks: Vec::new() }
    }
}

impl<W> Loader<W> {
    /// Creates a new empty [`Loader`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source of step definitions.
    #[must_use]
    pub fn steps<F>(mut self, source: F) -> Self
    where
        F: for<'reg> FnOnce(Steps<'reg, W>) -> crate::Result<()> + 'static,
    {
        self.steps.push(Box::new(source));
        self
    }

    /// Adds a source of hook definitions.
    #[must_use]
    pub fn hooks<F>(mut self, source: F) -> Self
    where
        F: for<'reg> FnOnce(Hooks<'reg, W>) -> crate::Result<()> + 'static,
    {
        self.hooks.push(Box::new(source));
        self
    }

    /// Runs all the added sources, populating a fresh [`Registry`].
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by a source, leaving the
    /// remaining sources untouched. A broken pattern cannot be skipped
    /// safely, as it would affect match sets of real steps.
    pub fn load(self) -> crate::Result<Registry<W>> {
        let mut registry = Registry::new();

        for source in self.steps {
            source(Steps { registry: &mut registry })?;
        }
        for source in self.hooks {
            source(Hooks { registry: &mut registry })?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            steps = registry.steps().len(),
            hooks = registry.hooks().len(),
            "definitions loaded",
        );

        Ok(registry)
    }
}

/// Registration handle injected into a step definitions source.
#[derive(Debug)]
pub struct Steps<'reg, W> {
    /// [`Registry`] being populated.
    registry: &'reg mut Registry<W>,
}

impl<W> Steps<'_, W> {
    /// Registers an unlabeled step definition.
    ///
    /// # Errors
    ///
    /// If the `pattern` isn't a valid regular expression.
    #[track_caller]
    pub fn step<F>(
        &mut self,
        pattern: &str,
        action: F,
    ) -> Result<(), InvalidPattern>
    where
        F: for<'a> Fn(&'a mut W, step::Context) -> LocalBoxFuture<'a, ()>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register_step(pattern, action)
    }

    /// Registers a step definition labeled with the given keyword.
    ///
    /// The label carries no matching semantics and only surfaces in
    /// diagnostics, such as ambiguous match listings.
    ///
    /// # Errors
    ///
    /// If the `pattern` isn't a valid regular expression.
    #[track_caller]
    pub fn labeled<F>(
        &mut self,
        label: impl Into<String>,
        pattern: &str,
        action: F,
    ) -> Result<(), InvalidPattern>
    where
        F: for<'a> Fn(&'a mut W, step::Context) -> LocalBoxFuture<'a, ()>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register_labeled_step(label, pattern, action)
    }

    /// Registers a `Given` step definition.
    ///
    /// # Errors
    ///
    /// If the `pattern` isn't a valid regular expression.
    #[track_caller]
    pub fn given<F>(
        &mut self,
        pattern: &str,
        action: F,
    ) -> Result<(), InvalidPattern>
    where
        F: for<'a> Fn(&'a mut W, step::Context) -> LocalBoxFuture<'a, ()>
            + Send
            + Sync
            + 'static,
    {
        self.labeled("Given", pattern, action)
    }

    /// Registers a `When` step definition.
    ///
    /// # Errors
    ///
    /// If the `pattern` isn't a valid regular expression.
    #[track_caller]
    pub fn when<F>(
        &mut self,
        pattern: &str,
        action: F,
    ) -> Result<(), InvalidPattern>
    where
        F: for<'a> Fn(&'a mut W, step::Context) -> LocalBoxFuture<'a, ()>
            + Send
            + Sync
            + 'static,
    {
        self.labeled("When", pattern, action)
    }

    /// Registers a `Then` step definition.
    ///
    /// # Errors
    ///
    /// If the `pattern` isn't a valid regular expression.
    #[track_caller]
    pub fn then<F>(
        &mut self,
        pattern: &str,
        action: F,
    ) -> Result<(), InvalidPattern>
    where
        F: for<'a> Fn(&'a mut W, step::Context) -> LocalBoxFuture<'a, ()>
            + Send
            + Sync
            + 'static,
    {
        self.labeled("Then", pattern, action)
    }
}

/// Registration handle injected into a hook definitions source.
#[derive(Debug)]
pub struct Hooks<'reg, W> {
    /// [`Registry`] being populated.
    registry: &'reg mut Registry<W>,
}

impl<W> Hooks<'_, W> {
    /// Registers a hook definition at the given lifecycle point.
    #[track_caller]
    pub fn hook<F>(
        &mut self,
        kind: HookKind,
        tag_filter: Option<TagFilter>,
        action: F,
    ) where
        F: for<'a> Fn(
                &'a crate::hook::Payload,
                Option<&'a mut W>,
            ) -> LocalBoxFuture<'a, ()>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register_hook(kind, tag_filter, action);
    }

    /// Registers a hook definition guarded by the given tag filter
    /// expression.
    ///
    /// # Errors
    ///
    /// If the `filter` isn't a valid tag filter expression.
    #[track_caller]
    pub fn tagged<F>(
        &mut self,
        kind: HookKind,
        filter: &str,
        action: F,
    ) -> Result<(), tagexpr::ParseError>
    where
        F: for<'a> Fn(
                &'a crate::hook::Payload,
                Option<&'a mut W>,
            ) -> LocalBoxFuture<'a, ()>
            + Send
            + Sync
            + 'static,
    {
        self.hook(kind, Some(filter.parse()?), action);
        Ok(())
    }
}
