//! Regrouping of per-query matches by literal series.

use std::collections::{BTreeMap, BTreeSet};

use crate::responses::SeriesMatch;

/// Regroup matches so each literal series appears once.
///
/// Queries may be patterns or may overlap, so the same series can show up in
/// several matches. Data, annotations, watches and alerts are each indexed by
/// the series they belong to and zipped into one [`SeriesMatch`] per distinct
/// series, ordered by series. A series present in only some of the
/// collections gets empty lists for the others.
pub fn group_by_series(matches: Vec<SeriesMatch>) -> Vec<SeriesMatch> {
    let mut data = BTreeMap::<String, Vec<_>>::new();
    let mut annotations = BTreeMap::<String, Vec<_>>::new();
    let mut watches = BTreeMap::<String, Vec<_>>::new();
    let mut alerts = BTreeMap::<String, Vec<_>>::new();

    for m in matches {
        for d in m.data {
            data.entry(d.series.clone()).or_default().push(d);
        }
        for a in m.annotations {
            annotations.entry(a.series.clone()).or_default().push(a);
        }
        for w in m.watches {
            watches.entry(w.series.clone()).or_default().push(w);
        }
        for a in m.alerts {
            alerts.entry(a.series.clone()).or_default().push(a);
        }
    }

    let series: BTreeSet<String> = data
        .keys()
        .chain(annotations.keys())
        .chain(watches.keys())
        .chain(alerts.keys())
        .cloned()
        .collect();

    series
        .into_iter()
        .map(|s| SeriesMatch {
            data: data.remove(&s).unwrap_or_default(),
            annotations: annotations.remove(&s).unwrap_or_default(),
            watches: watches.remove(&s).unwrap_or_default(),
            alerts: alerts.remove(&s).unwrap_or_default(),
            series: s,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responses::SeriesData;

    fn data(series: &str, instance: &str) -> SeriesData {
        SeriesData {
            series: series.to_string(),
            instance: instance.to_string(),
            points: Vec::new(),
            observed_min: None,
            observed_max: None,
            observed_avg: None,
        }
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(group_by_series(Vec::new()).is_empty());
    }

    #[test]
    fn output_is_ordered_by_series() {
        let matches = vec![SeriesMatch {
            series: "*".to_string(),
            data: vec![data("b", "x"), data("a", "x")],
            ..SeriesMatch::default()
        }];
        let grouped = group_by_series(matches);
        let names: Vec<&str> = grouped.iter().map(|m| m.series.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
