//! Classification of step and hook invocation results.

use std::{any::Any, borrow::Cow, sync::Arc};

use derive_more::with_trait::{Debug, Display};

use crate::step::AmbiguousMatch;

/// Alias for a [`catch_unwind()`] error.
///
/// [`catch_unwind()`]: std::panic::catch_unwind()
pub type Info = Arc<dyn Any + Send + 'static>;

/// Marker panic payload of an intentionally unimplemented step or hook,
/// raised by the [`pending!`] macro.
///
/// [`pending!`]: crate::pending
#[derive(Clone, Debug)]
pub struct PendingStep(pub Option<String>);

/// Failure of a single step or hook invocation.
#[derive(Clone, Debug)]
pub struct Failure {
    /// Human-readable message coerced from the panic payload.
    pub message: Cow<'static, str>,

    /// Raw panic payload.
    #[debug("{:p}", Arc::as_ptr(payload))]
    pub payload: Info,
}

impl Failure {
    /// Creates a new [`Failure`] out of the given panic payload.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let payload: Info = payload.into();
        Self { message: coerce_message(&payload), payload }
    }
}

/// Tries to coerce a panic payload [`Info`] into a human-readable message.
fn coerce_message(err: &Info) -> Cow<'static, str> {
    (**err)
        .downcast_ref::<String>()
        .map(|s| s.clone().into())
        .or_else(|| (**err).downcast_ref::<&str>().map(|s| s.to_owned().into()))
        .unwrap_or_else(|| "(Could not resolve panic payload)".into())
}

/// Outcome of a single step or hook invocation.
///
/// Emitted per invocation and local to it: a non-[`Passed`] [`Outcome`]
/// never corrupts the registry or aborts other scenarios.
///
/// [`Passed`]: Outcome::Passed
#[derive(Clone, Debug, Display)]
pub enum Outcome {
    /// Invocation returned normally.
    #[display("Passed")]
    Passed,

    /// Invocation signalled an intentionally unimplemented definition via
    /// the [`pending!`] macro, with its optional message.
    ///
    /// [`pending!`]: crate::pending
    #[display("Pending")]
    Pending(Option<String>),

    /// Invocation panicked.
    #[display("Failed: {}", _0.message)]
    Failed(Failure),

    /// Step line matched more than one registered definition, none of which
    /// was invoked.
    #[display("Ambiguous: {_0}")]
    Ambiguous(AmbiguousMatch),

    /// Step line matched no registered definition.
    #[display("Undefined")]
    Undefined,
}

impl Outcome {
    /// Creates a new [`Outcome`] out of the given panic payload, telling an
    /// intentional [`pending!`] signal from a genuine failure.
    ///
    /// [`pending!`]: crate::pending
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        match payload.downcast::<PendingStep>() {
            Ok(pending) => Self::Pending(pending.0),
            Err(payload) => Self::Failed(Failure::from_panic(payload)),
        }
    }

    /// Indicates whether this [`Outcome`] is a [`Passed`] one.
    ///
    /// [`Passed`]: Outcome::Passed
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Indicates whether this [`Outcome`] is a [`Failed`] one.
    ///
    /// [`Failed`]: Outcome::Failed
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
