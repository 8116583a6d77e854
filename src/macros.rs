//! Macro definitions.

/// Signals that the current step or hook is intentionally unimplemented,
/// aborting its invocation with a typed [`PendingStep`] panic payload.
///
/// The invoker classifies such a panic as [`Outcome::Pending`] instead of
/// [`Outcome::Failed`], so the scenario is reported as pending rather than
/// broken.
///
/// # Example
///
/// ```rust
/// use std::panic;
///
/// use cornichon::Outcome;
///
/// let payload = panic::catch_unwind(|| {
///     cornichon::pending!("no billing backend yet");
/// })
/// .expect_err("`pending!` panics");
///
/// let outcome = Outcome::from_panic(payload);
/// assert!(
///     matches!(outcome, Outcome::Pending(Some(msg)) if msg == "no billing backend yet"),
/// );
/// ```
///
/// [`Outcome::Failed`]: crate::Outcome::Failed
/// [`Outcome::Pending`]: crate::Outcome::Pending
/// [`PendingStep`]: crate::outcome::PendingStep
#[macro_export]
macro_rules! pending {
    () => {
        ::std::panic::panic_any($crate::outcome::PendingStep(
            ::std::option::Option::None,
        ))
    };
    ($($arg:tt)+) => {
        ::std::panic::panic_any($crate::outcome::PendingStep(
            ::std::option::Option::Some(::std::format!($($arg)+)),
        ))
    };
}
