use std::sync::{Arc, Mutex};

use cornichon::{
    dispatch, run_step, HookKind, Loader, Outcome, Payload, Registry,
};
use futures::FutureExt as _;

#[derive(Debug, Default)]
struct Order {
    drink: String,
    served: bool,
}

fn drinks_registry() -> Registry<Order> {
    Loader::<Order>::new()
        .steps(|mut steps| {
            steps.given(r#"^I have ordered hot "([^"]*)"$"#, |order, ctx| {
                async move {
                    order.drink =
                        ctx.arg(0).map(str::to_owned).unwrap_or_default();
                }
                .boxed_local()
            })?;
            steps.when("the drink is served", |order, _| {
                async move { order.served = true }.boxed_local()
            })?;
            steps.then(r"the cup holds (\w+)", |_, _| {
                async { panic!("must never be picked silently") }
                    .boxed_local()
            })?;
            steps.step(r"the cup holds coffee", |_, _| {
                async { panic!("must never be picked silently") }
                    .boxed_local()
            })?;
            Ok(())
        })
        .load()
        .unwrap()
}

#[tokio::test]
async fn matches_exactly_one_definition_end_to_end() {
    let registry = drinks_registry();

    let line = r#"I have ordered hot "coffee""#;
    let matches = registry.find_matching_steps(line);
    assert_eq!(matches.len(), 1);
    assert_eq!(
        matches[0].context.args().collect::<Vec<_>>(),
        ["coffee"],
    );

    let mut order = Order::default();
    let outcome = run_step(&registry, line, &mut order).await;

    assert!(outcome.is_passed(), "{outcome:?}");
    assert_eq!(order.drink, "coffee");
}

#[tokio::test]
async fn reports_every_candidate_of_an_ambiguous_line() {
    let registry = drinks_registry();

    let line = "the cup holds coffee";
    assert_eq!(registry.find_matching_steps(line).len(), 2);

    let mut order = Order::default();
    let outcome = run_step(&registry, line, &mut order).await;

    match outcome {
        Outcome::Ambiguous(err) => {
            let candidates = err
                .possible_matches
                .iter()
                .map(|c| (c.label.as_deref(), c.pattern.as_str()))
                .collect::<Vec<_>>();
            assert_eq!(
                candidates,
                [
                    (Some("Then"), r"the cup holds (\w+)"),
                    (None, r"the cup holds coffee"),
                ],
            );
            for candidate in &err.possible_matches {
                let location = candidate.location.unwrap();
                assert!(location.path.ends_with("order.rs"), "{location}");
            }
        }
        other => panic!("expected `Ambiguous`, got {other:?}"),
    }
}

#[tokio::test]
async fn reports_unmatched_line_as_undefined() {
    let registry = drinks_registry();
    let mut order = Order::default();

    let outcome = run_step(&registry, "I pay the bill", &mut order).await;

    assert!(matches!(outcome, Outcome::Undefined), "{outcome:?}");
    assert_eq!(order.drink, "");
}

#[tokio::test]
async fn alternation_in_a_pattern_stays_whole_line_anchored() {
    let registry = Loader::<Order>::new()
        .steps(|mut steps| {
            steps.when("^I pay|I leave", |order, _| {
                async move { order.served = true }.boxed_local()
            })?;
            Ok(())
        })
        .load()
        .unwrap();

    let mut order = Order::default();
    let outcome = run_step(&registry, "and then I leave", &mut order).await;

    assert!(matches!(outcome, Outcome::Undefined), "{outcome:?}");
    assert!(!order.served);

    let outcome = run_step(&registry, "I leave", &mut order).await;

    assert!(outcome.is_passed(), "{outcome:?}");
    assert!(order.served);
}

#[tokio::test]
async fn dispatches_hooks_in_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let registry = {
        let log = Arc::clone(&log);
        Loader::<Order>::new()
            .hooks(move |mut hooks| {
                for entry in ["open kitchen", "heat water", "grind beans"] {
                    let log = Arc::clone(&log);
                    hooks.hook(HookKind::BeforeScenario, None, move |_, _| {
                        let log = Arc::clone(&log);
                        async move { log.lock().unwrap().push(entry) }
                            .boxed_local()
                    });
                }
                Ok(())
            })
            .load()
            .unwrap()
    };

    let outcomes = dispatch(
        &registry,
        HookKind::BeforeScenario,
        Vec::<String>::new(),
        &Payload::for_scenario("Drinks", "Hot drinks"),
        None,
    )
    .await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(Outcome::is_passed));
    assert_eq!(
        *log.lock().unwrap(),
        ["open kitchen", "heat water", "grind beans"],
    );
}

#[tokio::test]
async fn fires_hooks_by_tag_filter() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let registry = {
        let log = Arc::clone(&log);
        Loader::<Order>::new()
            .hooks(move |mut hooks| {
                let slow_log = Arc::clone(&log);
                hooks.tagged(
                    HookKind::BeforeScenario,
                    "@slow",
                    move |_, _| {
                        let log = Arc::clone(&slow_log);
                        async move { log.lock().unwrap().push("slow") }
                            .boxed_local()
                    },
                )?;
                let wip_log = Arc::clone(&log);
                hooks.tagged(
                    HookKind::BeforeScenario,
                    "@slow and not @wip",
                    move |_, _| {
                        let log = Arc::clone(&wip_log);
                        async move { log.lock().unwrap().push("not wip") }
                            .boxed_local()
                    },
                )?;
                Ok(())
            })
            .load()
            .unwrap()
    };

    let fast = dispatch(
        &registry,
        HookKind::BeforeScenario,
        ["@fast"],
        &Payload::default(),
        None,
    )
    .await;
    assert!(fast.is_empty());
    assert!(log.lock().unwrap().is_empty());

    let slow = dispatch(
        &registry,
        HookKind::BeforeScenario,
        ["@slow"],
        &Payload::default(),
        None,
    )
    .await;
    assert_eq!(slow.len(), 2);
    assert_eq!(*log.lock().unwrap(), ["slow", "not wip"]);

    log.lock().unwrap().clear();
    let wip = dispatch(
        &registry,
        HookKind::BeforeScenario,
        ["@slow", "@wip"],
        &Payload::default(),
        None,
    )
    .await;
    assert_eq!(wip.len(), 1);
    assert_eq!(*log.lock().unwrap(), ["slow"]);
}

#[tokio::test]
async fn hook_observes_scenario_context() {
    let registry = Loader::<Order>::new()
        .hooks(|mut hooks| {
            hooks.hook(HookKind::AfterScenario, None, |payload, order| {
                async move {
                    assert_eq!(payload.scenario.as_deref(), Some("Espresso"));
                    if let Some(order) = order {
                        order.served = true;
                    }
                }
                .boxed_local()
            });
            Ok(())
        })
        .load()
        .unwrap();

    let mut order = Order::default();
    let outcomes = dispatch(
        &registry,
        HookKind::AfterScenario,
        Vec::<String>::new(),
        &Payload::for_scenario("Drinks", "Espresso"),
        Some(&mut order),
    )
    .await;

    assert!(outcomes.iter().all(Outcome::is_passed));
    assert!(order.served);
}
