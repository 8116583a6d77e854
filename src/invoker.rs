// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Invocation of matched step definitions and outcome classification.

use std::panic::AssertUnwindSafe;

use futures::FutureExt as _;
use itertools::Itertools as _;

use crate::{
    future::FutureExt as _,
    outcome::Outcome,
    registry::{Match, Registry},
    step::{AmbiguousMatch, Candidate},
};

/// Invokes the given matched step definition over the given scenario
/// context.
///
/// Panics of the action are trapped and classified: a normal return is
/// [`Outcome::Passed`], a [`pending!`] panic is [`Outcome::Pending`], any
/// other panic is [`Outcome::Failed`]. The invoker itself is stateless: all
/// side effects belong to the invoked action.
///
/// [`pending!`]: crate::pending
pub async fn invoke<W>(matched: Match<'_, W>, context: &mut W) -> Outcome {
    let Match { definition, context: step_context } = matched;

    let fut = AssertUnwindSafe((definition.action())(context, step_context))
        .catch_unwind();

    #[cfg(feature = "tracing")]
    let fut = tracing::Instrument::instrument(
        fut,
        tracing::info_span!("step", pattern = %definition.pattern()),
    );

    match fut.await {
        Ok(()) => Outcome::Passed,
        Err(info) => Outcome::from_panic(info),
    }
}

/// Matches the given step `line` against the given [`Registry`] and invokes
/// the only matching definition.
///
/// Zero matching definitions produce [`Outcome::Undefined`]; more than one
/// produce [`Outcome::Ambiguous`] carrying every candidate, without
/// invoking any of them.
pub async fn run_step<W>(
    registry: &Registry<W>,
    line: &str,
    context: &mut W,
) -> Outcome {
    match registry.find_matching_steps(line).into_iter().at_most_one() {
        Ok(Some(matched)) => invoke(matched, context).then_yield().await,
        Ok(None) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(line, "no step definition matches");

            Outcome::Undefined
        }
        Err(candidates) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(line, "multiple step definitions match");

            Outcome::Ambiguous(AmbiguousMatch {
                possible_matches: candidates
                    .map(|m| Candidate::from(m.definition))
                    .collect(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt as _;

    use super::{run_step, Outcome};
    use crate::registry::Registry;

    #[derive(Debug, Default)]
    struct Order {
        drink: String,
        brewed: bool,
    }

    fn registry() -> Registry<Order> {
        let mut registry = Registry::new();
        registry
            .register_step(
                r#"^I have ordered hot "([^"]*)"$"#,
                |order: &mut Order, ctx| {
                    async move {
                        order.drink = ctx
                            .arg(0)
                            .map(str::to_owned)
                            .unwrap_or_default();
                    }
                    .boxed_local()
                },
            )
            .unwrap();
        registry
            .register_step(r"the kettle boils", |order: &mut Order, _| {
                async move { order.brewed = true }.boxed_local()
            })
            .unwrap();
        registry
            .register_step(r"the kettle (boils|whistles)", |_, _| {
                async { panic!("must never run") }.boxed_local()
            })
            .unwrap();
        registry
            .register_step(r"the fuse blows", |_, _| {
                async { panic!("short circuit") }.boxed_local()
            })
            .unwrap();
        registry
            .register_step(r"the recipe is written", |_, _| {
                async { crate::pending!("recipe book pending") }.boxed_local()
            })
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn single_match_is_invoked_with_captures() {
        let registry = registry();
        let mut order = Order::default();

        let outcome = run_step(
            &registry,
            r#"I have ordered hot "coffee""#,
            &mut order,
        )
        .await;

        assert!(outcome.is_passed(), "{outcome:?}");
        assert_eq!(order.drink, "coffee");
    }

    #[tokio::test]
    async fn unmatched_line_is_undefined() {
        let registry = registry();
        let mut order = Order::default();

        let outcome =
            run_step(&registry, "I tip the waiter", &mut order).await;

        assert!(matches!(outcome, Outcome::Undefined), "{outcome:?}");
    }

    #[tokio::test]
    async fn ambiguous_line_is_reported_without_executing() {
        let registry = registry();
        let mut order = Order::default();

        let outcome =
            run_step(&registry, "the kettle boils", &mut order).await;

        match outcome {
            Outcome::Ambiguous(err) => {
                let patterns = err
                    .possible_matches
                    .iter()
                    .map(|c| c.pattern.as_str())
                    .collect::<Vec<_>>();
                assert_eq!(
                    patterns,
                    ["the kettle boils", "the kettle (boils|whistles)"],
                );
            }
            other => panic!("expected `Ambiguous`, got {other:?}"),
        }
        assert!(!order.brewed, "no candidate action may run");
    }

    #[tokio::test]
    async fn panicking_action_fails_with_coerced_message() {
        let registry = registry();
        let mut order = Order::default();

        let outcome = run_step(&registry, "the fuse blows", &mut order).await;

        match outcome {
            Outcome::Failed(failure) => {
                assert_eq!(failure.message, "short circuit");
            }
            other => panic!("expected `Failed`, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn pending_action_is_not_a_failure() {
        let registry = registry();
        let mut order = Order::default();

        let outcome =
            run_step(&registry, "the recipe is written", &mut order).await;

        assert!(
            matches!(
                outcome,
                Outcome::Pending(Some(ref msg)) if msg == "recipe book pending"
            ),
            "{outcome:?}",
        );
    }
}
