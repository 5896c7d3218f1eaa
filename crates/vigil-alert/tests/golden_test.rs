//! Golden scenario tests: each file in `test-fixtures/golden/scenarios` drives
//! one watch through a sequence of ticks and checks levels and alerts.

use std::sync::Arc;

use test_fixtures::{load_scenarios, Scenario, ScenarioCircumstance, ScenarioCondition};
use vigil_alert::{AlertService, Circumstance, Condition, Level, Operator, Watch};
use vigil_core::repository::InMemorySeriesRepository;
use vigil_core::{Metric, Sample, Series, VigilConfig};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn condition(c: &ScenarioCondition) -> Condition {
    let mut condition = Condition::new(Operator::parse(&c.operator).unwrap(), c.threshold);
    if let Some(times) = c.for_times {
        condition = condition.for_last_times(times);
    }
    if let Some(millis) = c.for_millis {
        condition = condition.for_last_millis(millis);
    }
    if c.on_average {
        condition = condition.on_average();
    }
    condition
}

fn circumstance(level: Level, c: Option<&ScenarioCircumstance>) -> Circumstance {
    let Some(c) = c else {
        return Circumstance::UNSPECIFIED;
    };
    let stop = c.stop.as_ref().map(condition).unwrap_or(Condition::NONE);
    let circumstance = Circumstance::new(level, condition(&c.start), stop);
    match &c.suppress {
        Some(s) => circumstance.suppressed_when(
            Metric::parse(&s.series, None).unwrap(),
            condition(&s.condition),
        ),
        None => circumstance,
    }
}

fn build_watch(scenario: &Scenario) -> Watch {
    let w = &scenario.watch;
    Watch::new(
        &w.name,
        Metric::parse(&w.series, w.unit.as_deref()).unwrap(),
        circumstance(Level::Red, w.red.as_ref()),
        circumstance(Level::Amber, w.amber.as_ref()),
        circumstance(Level::Green, w.green.as_ref()),
    )
    .unwrap()
}

fn suppressing_series(scenario: &Scenario) -> Option<Series> {
    let w = &scenario.watch;
    [&w.red, &w.amber, &w.green]
        .into_iter()
        .flatten()
        .find_map(|c| c.suppress.as_ref())
        .map(|s| Series::parse(&s.series).unwrap())
}

fn run(scenario: &Scenario) {
    let repo = Arc::new(InMemorySeriesRepository::new());
    let mut config = VigilConfig::default();
    config.evaluation.parallel = Some(false);
    let service = AlertService::new(repo.clone(), &config);

    let watch = build_watch(scenario);
    let series = watch.series().clone();
    let suppressing = suppressing_series(scenario);
    service.add_watch(watch);

    for tick in &scenario.ticks {
        let instance = tick.instance.as_deref().unwrap_or("server");
        for &(time, value) in &tick.samples {
            repo.ingest(&series, instance, Sample::new(time, value)).unwrap();
        }
        if let Some(s) = &suppressing {
            for &(time, value) in &tick.suppressing {
                repo.ingest(s, instance, Sample::new(time, value)).unwrap();
            }
        }

        let report = service.tick(tick.time);
        assert!(report.errors.is_empty(), "{}: tick {} failed", scenario.name, tick.time);

        let status = service
            .watch_statuses()
            .into_iter()
            .find(|s| s.watch.name() == scenario.watch.name)
            .unwrap();
        let level = status
            .states
            .iter()
            .find(|k| k.series == series && k.instance == instance)
            .and_then(|k| k.level);
        let expected = tick.expected_level.as_deref().map(|l| Level::parse(l).unwrap());
        assert_eq!(
            level, expected,
            "{}: unexpected level at t={}",
            scenario.name, tick.time
        );
    }

    let alerts = service.alerts();
    assert_eq!(
        alerts.len(),
        scenario.expected_alerts.len(),
        "{}: alert count",
        scenario.name
    );
    for (alert, expected) in alerts.iter().zip(&scenario.expected_alerts) {
        assert_eq!(alert.serial, expected.serial, "{}", scenario.name);
        assert_eq!(alert.level, Level::parse(&expected.level).unwrap(), "{}", scenario.name);
        assert_eq!(alert.started_at, expected.started_at, "{}", scenario.name);
        assert_eq!(alert.closed_at, expected.closed_at, "{}", scenario.name);
        assert_eq!(alert.watch, scenario.watch.name);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn golden_scenarios() {
    let scenarios = load_scenarios();
    assert!(!scenarios.is_empty());
    for scenario in &scenarios {
        run(scenario);
    }
}

#[test]
fn golden_scenarios_are_stable_under_repeated_ticks() {
    // Ticking again at the same time with no new data changes nothing.
    for scenario in load_scenarios() {
        let repo = Arc::new(InMemorySeriesRepository::new());
        let service = AlertService::new(repo.clone(), &VigilConfig::default());
        let watch = build_watch(&scenario);
        let series = watch.series().clone();
        service.add_watch(watch);
        for tick in &scenario.ticks {
            for &(time, value) in &tick.samples {
                repo.ingest(&series, "server", Sample::new(time, value)).unwrap();
            }
            service.tick(tick.time);
            let before = service.alerts();
            let report = service.tick(tick.time);
            assert!(report.changes.is_empty(), "{}", scenario.name);
            assert_eq!(service.alerts(), before, "{}", scenario.name);
        }
    }
}
