use proptest::prelude::*;
use vigil_core::model::Series;

fn tag() -> impl Strategy<Value = (String, String)> {
    ("[a-z@]{1,4}", "[a-zA-Z0-9_]{1,8}")
}

proptest! {
    #[test]
    fn canonical_form_reparses_to_equal_series(
        tags in prop::collection::vec(tag(), 0..4),
        name in "[A-Za-z][A-Za-z0-9]{0,12}",
    ) {
        let mut text = tags
            .iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect::<Vec<_>>();
        text.push(name.clone());
        let text = text.join(" ");

        let series = Series::parse(&text).unwrap();
        prop_assert_eq!(series.name(), name.as_str());
        prop_assert_eq!(series.tags().len(), tags.len());
        let again = Series::parse(series.as_str()).unwrap();
        prop_assert_eq!(again, series);
    }

    #[test]
    fn plain_series_match_only_themselves(
        a in "[a-z]{1,3}:[a-z]{1,3} [A-Z][a-z]{0,5}",
        b in "[a-z]{1,3}:[a-z]{1,3} [A-Z][a-z]{0,5}",
    ) {
        let sa = Series::parse(&a).unwrap();
        let sb = Series::parse(&b).unwrap();
        prop_assert_eq!(sa.matches(&sb), sa == sb);
    }

    #[test]
    fn parse_never_panics(s in ".{0,40}") {
        let _ = Series::parse(&s);
    }

    #[test]
    fn name_wildcard_matches_any_series_with_the_tags(
        ns in "[a-z]{1,5}",
        name in "[A-Z][a-z]{0,6}",
    ) {
        let pattern = Series::parse(&format!("ns:{ns} *")).unwrap();
        let concrete = Series::parse(&format!("ns:{ns} @:app {name}")).unwrap();
        prop_assert!(pattern.matches(&concrete));
    }
}
