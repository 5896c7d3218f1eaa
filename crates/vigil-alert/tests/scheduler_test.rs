//! AlertScheduler tests on the tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use vigil_alert::{AlertScheduler, AlertService, Circumstance, Condition, Level, Operator, Watch};
use vigil_core::repository::InMemorySeriesRepository;
use vigil_core::traits::Cancellable;
use vigil_core::{Metric, Sample, Series, VigilConfig};

fn service_with_hot_watch() -> Arc<AlertService> {
    let repo = Arc::new(InMemorySeriesRepository::new());
    let series = Series::parse("ns:jvm HeapUsage").unwrap();
    repo.ingest(&series, "server", Sample::new(0, 99.0)).unwrap();

    let service = AlertService::new(repo, &VigilConfig::default());
    service.add_watch(
        Watch::new(
            "heap",
            Metric::new(series, Default::default()),
            Circumstance::new(Level::Red, Condition::new(Operator::Gt, 90.0), Condition::NONE),
            Circumstance::UNSPECIFIED,
            Circumstance::UNSPECIFIED,
        )
        .unwrap(),
    );
    Arc::new(service)
}

#[tokio::test]
async fn scheduler_ticks_until_stopped() {
    let service = service_with_hot_watch();
    let scheduler = Arc::new(AlertScheduler::new(
        Arc::clone(&service),
        Duration::from_millis(10),
    ));
    let handle = Arc::clone(&scheduler).spawn();

    let mut waited = 0;
    while service.open_alerts().is_empty() && waited < 200 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        waited += 1;
    }
    assert_eq!(service.open_alerts().len(), 1);

    scheduler.stop();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("scheduler did not stop")
        .unwrap();
    assert!(scheduler.cancellation_token().is_cancelled());
}

#[tokio::test]
async fn cancelled_scheduler_exits_without_ticking() {
    let service = service_with_hot_watch();
    let scheduler = AlertScheduler::new(Arc::clone(&service), Duration::from_secs(60));
    scheduler.cancellation_token().cancel();

    tokio::time::timeout(Duration::from_secs(5), scheduler.run())
        .await
        .expect("scheduler did not stop");
    assert!(service.alerts().is_empty());
}

#[test]
fn interval_comes_from_config() {
    let mut config = VigilConfig::default();
    let service = service_with_hot_watch();
    assert_eq!(
        AlertScheduler::from_config(Arc::clone(&service), &config).interval(),
        Duration::from_millis(4000)
    );
    config.evaluation.interval_ms = Some(250);
    assert_eq!(
        AlertScheduler::from_config(service, &config).interval(),
        Duration::from_millis(250)
    );
}
