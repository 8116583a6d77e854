// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Ordered storage and lookup of step and hook definitions.

use std::sync::Arc;

use derive_more::with_trait::Debug;
use futures::future::LocalBoxFuture;

use crate::{
    hook,
    pattern::{InvalidPattern, StepPattern},
    step::{self, Location},
    tagexpr::{Ext as _, TagFilter},
};

/// Ordered collection of step and hook definitions, read-only once loading
/// has finished.
///
/// Registration order is preserved and significant: lookups try definitions
/// strictly in the order they were registered, and never deduplicate.
#[derive(Debug)]
pub struct Registry<W> {
    /// Registered step definitions, in registration order.
    steps: Vec<step::Definition<W>>,

    /// Registered hook definitions, in registration order.
    hooks: Vec<hook::Definition<W>>,
}

// Implemented manually to omit redundant `W: Clone` trait bound, imposed by
// `#[derive(Clone)]`.
impl<W> Clone for Registry<W> {
    fn clone(&self) -> Self {
        Self { steps: self.steps.clone(), hooks: self.hooks.clone() }
    }
}

// Implemented manually to omit redundant `W: Default` trait bound, imposed
// by `#[derive(Default)]`.
impl<W> Default for Registry<W> {
    fn default() -> Self {
        Self { steps: Vec::new(), hooks: Vec::new() }
    }
}

impl<W> Registry<W> {
    /// Creates a new empty [`Registry`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a step definition matching the given `pattern`.
    ///
    /// # Errors
    ///
    /// If the given `pattern` is not a valid regular expression.
    #[track_caller]
    pub fn register_step<F>(
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
        self.insert_step(None, pattern, action)
    }

    /// Registers a step definition matching the given `pattern` under the
    /// given `label`.
    ///
    /// Labels are inert annotations: they never participate in matching and
    /// only show up in diagnostics.
    ///
    /// # Errors
    ///
    /// If the given `pattern` is not a valid regular expression.
    #[track_caller]
    pub fn register_labeled_step<F>(
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
        self.insert_step(Some(label.into()), pattern, action)
    }

    #[track_caller]
    fn insert_step<F>(
        &mut self,
        label: Option<String>,
        pattern: &str,
        action: F,
    ) -> Result<(), InvalidPattern>
    where
        F: for<'a> Fn(&'a mut W, step::Context) -> LocalBoxFuture<'a, ()>
            + Send
            + Sync
            + 'static,
    {
        let pattern = StepPattern::compile(pattern)?;
        self.steps.push(step::Definition::new(
            pattern,
            label,
            Some(Location::caller()),
            Arc::new(action),
        ));
        Ok(())
    }

    /// Registers a hook definition at the given lifecycle point, guarded by
    /// the given tag filter.
    ///
    /// A `None` filter always matches. Suite-level [`HookKind`]s ignore
    /// filters entirely.
    ///
    /// [`HookKind`]: hook::HookKind
    #[track_caller]
    pub fn register_hook<F>(
        &mut self,
        kind: hook::HookKind,
        tag_filter: Option<TagFilter>,
        action: F,
    ) where
        F: for<'a> Fn(
                &'a hook::Payload,
                Option<&'a mut W>,
            ) -> LocalBoxFuture<'a, ()>
            + Send
            + Sync
            + 'static,
    {
        self.hooks.push(hook::Definition::new(
            kind,
            tag_filter,
            Some(Location::caller()),
            Arc::new(action),
        ));
    }

    /// Returns every registered step definition matching the given step
    /// `line`, in registration order.
    ///
    /// All matches are returned: no deduplication, no reordering, no
    /// specificity scoring. Resolving multiple matches is the invoking
    /// layer's policy.
    #[must_use]
    pub fn find_matching_steps(&self, line: &str) -> Vec<Match<'_, W>> {
        self.steps
            .iter()
            .filter_map(|definition| {
                definition.pattern().match_line(line).map(|matches| Match {
                    definition,
                    context: step::Context::new(line, matches),
                })
            })
            .collect()
    }

    /// Returns every registered hook definition of the given `kind` whose
    /// tag filter allows the given `active_tags`, in registration order.
    #[must_use]
    pub fn find_matching_hooks<I, S>(
        &self,
        kind: hook::HookKind,
        active_tags: I,
    ) -> Vec<&hook::Definition<W>>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S> + Clone,
    {
        self.hooks
            .iter()
            .filter(|h| {
                h.kind() == kind
                    && (kind.is_suite_level()
                        || h.tag_filter().allows(active_tags.clone()))
            })
            .collect()
    }

    /// Returns all the registered step definitions, in registration order.
    #[must_use]
    pub fn steps(&self) -> &[step::Definition<W>] {
        &self.steps
    }

    /// Returns all the registered hook definitions, in registration order.
    #[must_use]
    pub fn hooks(&self) -> &[hook::Definition<W>] {
        &self.hooks
    }
}

/// Successful match of a step line against a registered step
/// [`Definition`], ready to be invoked.
///
/// [`Definition`]: step::Definition
#[derive(Debug)]
pub struct Match<'reg, W> {
    /// Matched step definition.
    pub definition: &'reg step::Definition<W>,

    /// Invocation context carrying the extracted capture groups.
    pub context: step::Context,
}
