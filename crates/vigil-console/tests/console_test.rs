//! Console tests: series queries, grouping, alerts and watch management.

use std::sync::Arc;

use vigil_alert::{AlertService, AlertStatus, Level};
use vigil_console::{
    group_by_series, CircumstanceData, ConditionData, Console, ConsoleError, DataType, SeriesData,
    SeriesMatch, SeriesQuery, SeriesRequest, WatchData,
};
use vigil_core::errors::VigilErrorCode;
use vigil_core::repository::InMemorySeriesRepository;
use vigil_core::{Sample, Series, SeriesAnnotation, VigilConfig, WatchError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const HEAP: &str = "ns:jvm HeapUsage";

fn setup() -> (Arc<InMemorySeriesRepository>, Arc<AlertService>, Console) {
    let repo = Arc::new(InMemorySeriesRepository::new());
    let mut config = VigilConfig::default();
    config.evaluation.parallel = Some(false);
    let service = Arc::new(AlertService::new(repo.clone(), &config));
    let console = Console::new(repo.clone(), Arc::clone(&service));
    (repo, service, console)
}

fn ingest(repo: &InMemorySeriesRepository, series: &str, instance: &str, time: i64, value: f64) {
    repo.ingest(&Series::parse(series).unwrap(), instance, Sample::new(time, value))
        .unwrap();
}

fn condition(operator: &str, threshold: f64) -> ConditionData {
    ConditionData {
        operator: operator.to_string(),
        threshold,
        for_times: None,
        for_millis: None,
        on_average: false,
    }
}

fn heap_watch_data(name: &str) -> WatchData {
    WatchData {
        name: name.to_string(),
        series: HEAP.to_string(),
        unit: Some("percent".to_string()),
        disabled: false,
        red: Some(CircumstanceData {
            start: Some(condition(">", 90.0)),
            stop: Some(condition("<", 80.0)),
            ..CircumstanceData::default()
        }),
        amber: Some(CircumstanceData {
            level: Some("amber".to_string()),
            start: Some(ConditionData {
                for_times: Some(3),
                on_average: true,
                ..condition(">=", 70.0)
            }),
            ..CircumstanceData::default()
        }),
        green: None,
        states: Default::default(),
    }
}

fn data(series: &str, instance: &str) -> SeriesData {
    SeriesData {
        series: series.to_string(),
        instance: instance.to_string(),
        points: vec![Sample::new(0, 1.0)],
        observed_min: Some(1.0),
        observed_max: Some(1.0),
        observed_avg: Some(1.0),
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

#[test]
fn grouping_merges_matches_of_the_same_series() {
    let first = SeriesMatch {
        series: "mem:*".to_string(),
        data: vec![data("mem:heap", "a")],
        ..SeriesMatch::default()
    };
    let second = SeriesMatch {
        series: "mem:heap".to_string(),
        data: vec![data("mem:heap", "b")],
        ..SeriesMatch::default()
    };
    let grouped = group_by_series(vec![first, second]);
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].series, "mem:heap");
    let instances: Vec<&str> = grouped[0].data.iter().map(|d| d.instance.as_str()).collect();
    assert_eq!(instances, vec!["a", "b"]);
    assert!(grouped[0].alerts.is_empty());
}

#[test]
fn grouping_keeps_series_that_only_have_alerts() {
    let (repo, _, console) = setup();
    console.create_watch(&heap_watch_data("heap")).unwrap();
    ingest(&repo, HEAP, "server", 1000, 95.0);
    console.alert_service().tick(1000);

    let request = SeriesRequest::new(vec![
        SeriesQuery::new(HEAP).excluding(DataType::Points).excluding(DataType::Watches),
        SeriesQuery::new("ns:os CpuUsage"),
    ])
    .grouped();
    let response = console.query(&request).unwrap();
    assert_eq!(response.matches.len(), 1);
    assert_eq!(response.matches[0].series, HEAP);
    assert_eq!(response.matches[0].alerts.len(), 1);
    assert!(response.matches[0].data.is_empty());
}

// ---------------------------------------------------------------------------
// Series queries
// ---------------------------------------------------------------------------

#[test]
fn series_data_bundles_everything() {
    let (repo, _, console) = setup();
    console.create_watch(&heap_watch_data("heap")).unwrap();
    ingest(&repo, HEAP, "server", 1000, 95.0);
    console.alert_service().tick(1000);
    ingest(&repo, HEAP, "server", 2000, 85.0);
    repo.annotate(SeriesAnnotation {
        time: 1500,
        series: Series::parse(HEAP).unwrap(),
        instance: "server".to_string(),
        attrs: vec![("cause".to_string(), "gc".to_string())],
    })
    .unwrap();
    console.alert_service().tick(2000);

    let response = console.series_data(HEAP).unwrap();
    assert_eq!(response.matches.len(), 1);
    let m = &response.matches[0];
    assert_eq!(m.series, HEAP);
    assert_eq!(m.data.len(), 1);
    assert_eq!(m.data[0].points.len(), 2);
    assert_eq!(m.data[0].observed_max, Some(95.0));
    assert_eq!(m.data[0].observed_min, Some(85.0));
    assert_eq!(m.annotations.len(), 1);
    assert_eq!(m.annotations[0].attrs[0].1, "gc");
    assert_eq!(m.watches.len(), 1);
    assert_eq!(m.watches[0].states[HEAP]["server"], Some(Level::Red));
    assert_eq!(m.alerts.len(), 1);
    assert_eq!(response.alerts.unacknowledged_red, 1);
}

#[test]
fn invalid_series_matches_nothing() {
    let (repo, _, console) = setup();
    ingest(&repo, HEAP, "server", 1000, 95.0);

    let response = console.series_data("ns: HeapUsage").unwrap();
    assert_eq!(response.matches.len(), 1);
    assert!(response.matches[0].data.is_empty());
    assert!(console.annotations_data("").unwrap().is_empty());
    assert!(console.alerts_data_for("bad: HeapUsage").alerts.is_empty());
}

#[test]
fn excluded_types_are_not_fetched() {
    let (repo, _, console) = setup();
    ingest(&repo, HEAP, "server", 1000, 95.0);
    console.create_watch(&heap_watch_data("heap")).unwrap();

    let query = SeriesQuery::new(HEAP)
        .excluding(DataType::Points)
        .excluding(DataType::Watches);
    let response = console.query(&SeriesRequest::new(vec![query])).unwrap();
    assert!(response.matches[0].data.is_empty());
    assert!(response.matches[0].watches.is_empty());
}

#[test]
fn truncation_keeps_latest_entries() {
    let (repo, _, console) = setup();
    for t in 1..=5 {
        ingest(&repo, HEAP, "server", t * 1000, t as f64);
    }
    let query = SeriesQuery::new(HEAP).truncating(DataType::Points);
    let response = console.query(&SeriesRequest::new(vec![query])).unwrap();
    let data = &response.matches[0].data[0];
    assert_eq!(data.points, vec![Sample::new(5000, 5.0)]);
    assert_eq!(data.observed_avg, Some(3.0));
}

#[test]
fn instance_filter_applies_to_queries() {
    let (repo, _, console) = setup();
    ingest(&repo, HEAP, "a", 1000, 1.0);
    ingest(&repo, HEAP, "b", 1000, 1.0);
    let query = SeriesQuery::new(HEAP).with_instances(["b"]);
    let response = console.query(&SeriesRequest::new(vec![query])).unwrap();
    assert_eq!(response.matches[0].data.len(), 1);
    assert_eq!(response.matches[0].data[0].instance, "b");
}

#[test]
fn series_and_instance_catalogue() {
    let (repo, _, console) = setup();
    ingest(&repo, "ns:web RequestCount", "b", 1000, 1.0);
    ingest(&repo, HEAP, "a", 1000, 1.0);
    ingest(&repo, HEAP, "b", 1000, 1.0);
    assert_eq!(
        console.series_names().unwrap(),
        vec![HEAP.to_string(), "ns:web RequestCount".to_string()]
    );
    assert_eq!(console.instance_names().unwrap(), vec!["a", "b"]);
}

#[test]
fn requests_deserialize_with_defaults() {
    let request: SeriesRequest = serde_json::from_str(
        r#"{ "queries": [ { "series": "ns:jvm HeapUsage", "exclude": ["ANNOTATIONS"] } ], "group_by_series": true }"#,
    )
    .unwrap();
    assert!(request.group_by_series);
    assert!(request.queries[0].excludes(DataType::Annotations));
    assert!(request.queries[0].instances.is_empty());
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[test]
fn alerts_by_serial_or_series() {
    let (repo, _, console) = setup();
    console.create_watch(&heap_watch_data("heap")).unwrap();
    ingest(&repo, HEAP, "server", 1000, 95.0);
    console.alert_service().tick(1000);

    assert_eq!(console.alerts_data().alerts.len(), 1);
    let by_serial = console.alerts_data_for("1");
    assert_eq!(by_serial.alerts.len(), 1);
    assert_eq!(by_serial.alerts[0].serial, 1);
    assert!(console.alerts_data_for("2").alerts.is_empty());
    assert_eq!(console.alerts_data_for(HEAP).alerts.len(), 1);
    assert_eq!(console.alerts_data_for("ns:jvm *").alerts.len(), 1);
    assert!(console.alerts_data_for("ns:os CpuUsage").alerts.is_empty());
}

#[test]
fn acknowledge_through_console() {
    let (repo, service, console) = setup();
    console.create_watch(&heap_watch_data("heap")).unwrap();
    ingest(&repo, HEAP, "server", 1000, 95.0);
    service.tick(1000);

    console.acknowledge_alert(1);
    console.acknowledge_alert(77);
    let alert = &console.alerts_data().alerts[0];
    assert_eq!(alert.status, AlertStatus::Acknowledged);
    assert!(alert.acknowledged_at.is_some());
    assert_eq!(service.statistics().acknowledged_red, 1);
}

// ---------------------------------------------------------------------------
// Watches
// ---------------------------------------------------------------------------

#[test]
fn created_watch_reads_back() {
    let (_, _, console) = setup();
    let created = console.create_watch(&heap_watch_data("heap")).unwrap();
    let watches = console.watches_data().watches;
    assert_eq!(watches.len(), 1);
    let data = &watches[0];
    assert_eq!(data.name, "heap");
    assert_eq!(data.series, HEAP);
    assert_eq!(data.unit.as_deref(), Some("percent"));
    assert!(data.states.is_empty());

    let amber = data.amber.as_ref().unwrap();
    assert_eq!(amber.start.as_ref().unwrap().for_times, Some(3));
    assert!(amber.start.as_ref().unwrap().on_average);
    assert_eq!(data.to_watch().unwrap(), created);
}

#[test]
fn create_watch_validates() {
    let (_, service, console) = setup();

    let mut nameless = heap_watch_data("");
    nameless.series = "not valid:".to_string();
    let err = console.create_watch(&nameless).unwrap_err();
    assert!(matches!(err, ConsoleError::Watch(WatchError::Validation(_))));
    assert_eq!(err.error_code(), "VALIDATION_ERROR");

    let mut no_start = heap_watch_data("heap");
    no_start.red = None;
    no_start.amber = Some(CircumstanceData::default());
    assert!(matches!(
        console.create_watch(&no_start),
        Err(ConsoleError::Watch(WatchError::Validation(_)))
    ));

    let mut bad_operator = heap_watch_data("heap");
    bad_operator.red.as_mut().unwrap().start = Some(condition("~", 1.0));
    assert!(matches!(
        console.create_watch(&bad_operator),
        Err(ConsoleError::Watch(WatchError::Validation(_)))
    ));

    let mut bad_level = heap_watch_data("heap");
    bad_level.red.as_mut().unwrap().level = Some("purple".to_string());
    assert!(console.create_watch(&bad_level).is_err());

    let mut bad_unit = heap_watch_data("heap");
    bad_unit.unit = Some("furlongs".to_string());
    let err = console.create_watch(&bad_unit).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_METRIC");

    let mut orphan_suppress = heap_watch_data("heap");
    orphan_suppress.red.as_mut().unwrap().suppress = Some(condition("=", 1.0));
    assert!(console.create_watch(&orphan_suppress).is_err());

    assert_eq!(service.watch_count(), 0);
}

#[test]
fn suppression_round_trips() {
    let (_, _, console) = setup();
    let mut data = heap_watch_data("heap");
    {
        let red = data.red.as_mut().unwrap();
        red.suppress = Some(condition("=", 1.0));
        red.suppressing_series = Some("ns:web Maintenance".to_string());
    }
    console.create_watch(&data).unwrap();
    let red = console.watches_data().watches[0].red.clone().unwrap();
    assert_eq!(red.suppressing_series.as_deref(), Some("ns:web Maintenance"));
    assert_eq!(red.suppressing_unit.as_deref(), Some("count"));
    assert_eq!(red.suppress.unwrap().operator, "=");
}

#[test]
fn patch_and_delete_watch() {
    let (_, service, console) = setup();
    console.create_watch(&heap_watch_data("heap")).unwrap();

    console.patch_watch("heap", true).unwrap();
    assert!(console.watches_data().watches[0].disabled);
    console.patch_watch("heap", false).unwrap();
    assert!(!console.watches_data().watches[0].disabled);

    let err = console.patch_watch("missing", true).unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");

    console.delete_watch("heap");
    console.delete_watch("heap");
    assert_eq!(service.watch_count(), 0);
}

#[test]
fn watch_data_json_shape() {
    let json = r#"{
        "name": "cpu",
        "series": "ns:os CpuUsage",
        "red": { "start": { "operator": "gt", "threshold": 90, "for_millis": 30000 } }
    }"#;
    let data: WatchData = serde_json::from_str(json).unwrap();
    let watch = data.to_watch().unwrap();
    assert_eq!(watch.red().level(), Level::Red);
    assert_eq!(watch.red().start().for_millis(), Some(30_000));
    assert!(!watch.amber().is_specified());
}
