//! Hook definitions: lifecycle-bound async actions.

use std::sync::Arc;

use derive_more::with_trait::{Debug, Display};
use futures::future::LocalBoxFuture;

use crate::{step::Location, tagexpr::TagFilter};

/// Lifecycle point a hook [`Definition`] is attached to.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[display("{self:?}")]
pub enum HookKind {
    /// Before any feature of the run executes.
    BeforeSuite,

    /// After every feature of the run has executed.
    AfterSuite,

    /// Before a feature's scenarios execute.
    BeforeFeature,

    /// After a feature's scenarios have executed.
    AfterFeature,

    /// Before a scenario's steps execute.
    BeforeScenario,

    /// After a scenario's steps have executed.
    AfterScenario,

    /// Before every single step.
    BeforeStep,

    /// After every single step.
    AfterStep,
}

impl HookKind {
    /// Indicates whether this [`HookKind`] addresses the whole run, making
    /// tag filters inapplicable to it.
    #[must_use]
    pub const fn is_suite_level(self) -> bool {
        matches!(self, Self::BeforeSuite | Self::AfterSuite)
    }
}

/// References to the run entities a lifecycle event is about, produced by
/// the embedding runner.
///
/// Suite-level events carry the empty [`Default`] payload.
#[derive(Clone, Debug, Default)]
pub struct Payload {
    /// Name of the feature the event addresses, if any.
    pub feature: Option<String>,

    /// Name of the scenario the event addresses, if any.
    pub scenario: Option<String>,

    /// Step line the event addresses, if any.
    pub step: Option<String>,
}

impl Payload {
    /// Creates a new [`Payload`] addressing the given feature.
    #[must_use]
    pub fn for_feature(feature: impl Into<String>) -> Self {
        Self { feature: Some(feature.into()), scenario: None, step: None }
    }

    /// Creates a new [`Payload`] addressing the given scenario.
    #[must_use]
    pub fn for_scenario(
        feature: impl Into<String>,
        scenario: impl Into<String>,
    ) -> Self {
        Self {
            feature: Some(feature.into()),
            scenario: Some(scenario.into()),
            step: None,
        }
    }

    /// Creates a new [`Payload`] addressing the given step.
    #[must_use]
    pub fn for_step(
        feature: impl Into<String>,
        scenario: impl Into<String>,
        step: impl Into<String>,
    ) -> Self {
        Self {
            feature: Some(feature.into()),
            scenario: Some(scenario.into()),
            step: Some(step.into()),
        }
    }
}

/// Alias for a hook [`Definition`]'s action.
///
/// Receives the lifecycle event's [`Payload`] and, for scenario-scoped
/// events, the scenario's context handle.
pub type HookFn<W> = Arc<
    dyn for<'a> Fn(&'a Payload, Option<&'a mut W>) -> LocalBoxFuture<'a, ()>
        + Send
        + Sync,
>;

/// Single registered hook definition.
#[derive(Debug)]
pub struct Definition<W> {
    /// Lifecycle point this definition is attached to.
    kind: HookKind,

    /// Filter over a scenario's tags, with `None` always matching.
    ///
    /// Ignored entirely for suite-level [`HookKind`]s.
    tag_filter: Option<TagFilter>,

    /// Callsite this definition was registered at.
    location: Option<Location>,

    /// Action to invoke on dispatch.
    #[debug("{:p}", Arc::as_ptr(action))]
    action: HookFn<W>,
}

// Implemented manually to omit redundant `W: Clone` trait bound, imposed by
// `#[derive(Clone)]`.
impl<W> Clone for Definition<W> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            tag_filter: self.tag_filter.clone(),
            location: self.location,
            action: Arc::clone(&self.action),
        }
    }
}

impl<W> Definition<W> {
    /// Creates a new [`Definition`].
    pub(crate) fn new(
        kind: HookKind,
        tag_filter: Option<TagFilter>,
        location: Option<Location>,
        action: HookFn<W>,
    ) -> Self {
        Self { kind, tag_filter, location, action }
    }

    /// Returns the lifecycle point this [`Definition`] is attached to.
    #[must_use]
    pub fn kind(&self) -> HookKind {
        self.kind
    }

    /// Returns the tag filter guarding this [`Definition`].
    #[must_use]
    pub fn tag_filter(&self) -> &Option<TagFilter> {
        &self.tag_filter
    }

    /// Returns the callsite this [`Definition`] was registered at.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Returns the action of this [`Definition`].
    #[must_use]
    pub fn action(&self) -> &HookFn<W> {
        &self.action
    }
}
