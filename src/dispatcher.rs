//! Dispatch of lifecycle hooks in registration order.

use std::panic::AssertUnwindSafe;

use futures::FutureExt as _;

use crate::{
    future::FutureExt as _,
    hook::{HookKind, Payload},
    outcome::Outcome,
    registry::Registry,
};

/// Policy of continuing a dispatch after a hook invocation fails.
///
/// Picked by the embedding runner; failure handling is its configuration
/// concern, not the hooks' one.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Policy {
    /// Keep invoking the remaining matching hooks.
    #[default]
    KeepGoing,

    /// Stop dispatching at this lifecycle point after the first
    /// [`Outcome::Failed`].
    HaltOnFailure,
}

/// Invokes every hook of the given `kind` matching the given `active_tags`,
/// in registration order, with the default [`Policy`].
pub async fn dispatch<W, I, S>(
    registry: &Registry<W>,
    kind: HookKind,
    active_tags: I,
    payload: &Payload,
    context: Option<&mut W>,
) -> Vec<Outcome>
where
    S: AsRef<str>,
    I: IntoIterator<Item = S> + Clone,
{
    dispatch_with(Policy::default(), registry, kind, active_tags, payload, context)
        .await
}

/// Invokes every hook of the given `kind` matching the given `active_tags`,
/// in registration order, under the given [`Policy`].
///
/// Panics of hook actions are trapped and classified exactly like step
/// invocations. Yields after every hook, so concurrently running scenarios
/// interleave fairly.
pub async fn dispatch_with<W, I, S>(
    policy: Policy,
    registry: &Registry<W>,
    kind: HookKind,
    active_tags: I,
    payload: &Payload,
    mut context: Option<&mut W>,
) -> Vec<Outcome>
where
    S: AsRef<str>,
    I: IntoIterator<Item = S> + Clone,
{
    let hooks = registry.find_matching_hooks(kind, active_tags);
    let mut outcomes = Vec::with_capacity(hooks.len());

    for hook in hooks {
        #[cfg(feature = "tracing")]
        tracing::debug!(%kind, location = ?hook.location(), "invoking hook");

        let result = AssertUnwindSafe((hook.action())(
            payload,
            context.as_mut().map(|w| &mut **w),
        ))
        .catch_unwind()
        .then_yield()
        .await;

        let outcome = match result {
            Ok(()) => Outcome::Passed,
            Err(info) => Outcome::from_panic(info),
        };

        let halt = policy == Policy::HaltOnFailure && outcome.is_failed();
        outcomes.push(outcome);
        if halt {
            break;
        }
    }

    outcomes
}
