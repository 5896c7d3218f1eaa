//! Property tests for conditions, circumstances and the alert service.

use std::sync::Arc;

use proptest::prelude::*;

use vigil_alert::{AlertService, Circumstance, Condition, Level, Operator, Watch};
use vigil_core::repository::InMemorySeriesRepository;
use vigil_core::{Metric, Sample, Series, VigilConfig};

fn operator_strategy() -> impl Strategy<Value = Operator> {
    prop::sample::select(vec![
        Operator::Gt,
        Operator::Ge,
        Operator::Lt,
        Operator::Le,
        Operator::Eq,
        Operator::Ne,
    ])
}

fn samples_strategy() -> impl Strategy<Value = Vec<Sample>> {
    prop::collection::vec(-1000.0_f64..1000.0, 1..30).prop_map(|values| {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Sample::new(i as i64 * 1000, v))
            .collect()
    })
}

proptest! {
    #[test]
    fn no_window_depends_only_on_latest(
        op in operator_strategy(),
        threshold in -1000.0_f64..1000.0,
        history in samples_strategy(),
        other in samples_strategy(),
    ) {
        let c = Condition::new(op, threshold);
        let last = *history.last().unwrap();
        let mut mixed = other.clone();
        mixed.push(Sample::new(last.time.max(mixed.last().unwrap().time + 1), last.value));
        prop_assert_eq!(
            c.is_satisfied(&history, last.time),
            c.is_satisfied(&mixed, last.time)
        );
        prop_assert_eq!(c.is_satisfied(&history, last.time), op.compare(last.value, threshold));
    }

    #[test]
    fn none_is_never_satisfied(history in samples_strategy(), times in 0usize..10) {
        let c = Condition::NONE.for_last_times(times).on_average();
        prop_assert!(!c.is_satisfied(&history, 100_000));
    }

    #[test]
    fn suppressed_circumstance_is_never_active(
        history in samples_strategy(),
        active in any::<bool>(),
        threshold in -1000.0_f64..1000.0,
    ) {
        let c = Circumstance::new(Level::Red, Condition::new(Operator::Gt, threshold), Condition::NONE)
            .suppressed_when(
                Metric::parse("ns:web Maintenance", None).unwrap(),
                Condition::new(Operator::Eq, 1.0),
            );
        let suppressing = [Sample::new(0, 1.0)];
        prop_assert!(!c.evaluate(&history, Some(&suppressing), active, 100_000));
    }

    #[test]
    fn serials_increase_and_one_open_alert_per_level(
        values in prop::collection::vec(0.0_f64..100.0, 1..40),
    ) {
        let repo = Arc::new(InMemorySeriesRepository::new());
        let mut config = VigilConfig::default();
        config.evaluation.parallel = Some(false);
        let service = AlertService::new(repo.clone(), &config);
        let series = Series::parse("ns:jvm HeapUsage").unwrap();
        service.add_watch(
            Watch::new(
                "heap",
                Metric::new(series.clone(), Default::default()),
                Circumstance::new(
                    Level::Red,
                    Condition::new(Operator::Gt, 90.0),
                    Condition::new(Operator::Lt, 80.0),
                ),
                Circumstance::new(
                    Level::Amber,
                    Condition::new(Operator::Gt, 70.0),
                    Condition::new(Operator::Lt, 60.0),
                ),
                Circumstance::UNSPECIFIED,
            )
            .unwrap(),
        );

        for (i, value) in values.iter().enumerate() {
            let t = i as i64 * 1000;
            repo.ingest(&series, "server", Sample::new(t, *value)).unwrap();
            service.tick(t);

            let open = service.open_alerts();
            prop_assert!(open.iter().filter(|a| a.level == Level::Red).count() <= 1);
            prop_assert!(open.iter().filter(|a| a.level == Level::Amber).count() <= 1);
            prop_assert!(open.iter().all(|a| a.level != Level::Green));
        }

        let serials: Vec<u64> = service.alerts().iter().map(|a| a.serial).collect();
        prop_assert!(serials.windows(2).all(|w| w[0] < w[1]));
        if let Some(first) = serials.first() {
            prop_assert_eq!(*first, 1);
        }
    }
}
