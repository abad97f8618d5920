use chrono::NaiveDateTime;
use duespan::error::ParseError;
use duespan::span::{INVALID_RANGE_MSG, SpanOutcome, compute_span, compute_span_with_formats};

fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{}T{}", date, time), "%Y-%m-%dT%H:%M:%S").unwrap()
}

#[test]
fn test_absent_input_is_empty() {
    let now = at("2024-06-01", "10:00:00");

    let outcome = compute_span(None, Some("2024-01-05"), now).unwrap();
    assert_eq!(outcome, SpanOutcome::Empty);
    assert_eq!(outcome.render(), "");

    let outcome = compute_span(Some("2024-01-01"), None, now).unwrap();
    assert_eq!(outcome, SpanOutcome::Empty);

    let outcome = compute_span(None, None, now).unwrap();
    assert_eq!(outcome, SpanOutcome::Empty);
}

#[test]
fn test_blank_input_is_empty_without_parsing() {
    let now = at("2024-06-01", "10:00:00");

    // The other side is garbage, but blank short-circuits before parsing
    let outcome = compute_span(Some("   "), Some("garbage"), now).unwrap();
    assert_eq!(outcome, SpanOutcome::Empty);

    let outcome = compute_span(Some(""), Some("2024-01-05"), now).unwrap();
    assert_eq!(outcome, SpanOutcome::Empty);
}

#[test]
fn test_end_before_start_is_invalid() {
    let now = at("2024-06-01", "10:00:00");

    for (start, end) in [
        ("2024-01-10", "2024-01-05"),
        ("2024-06-01", "2024-05-31"),
        ("2025-01-01", "2024-12-31"),
    ] {
        let outcome = compute_span(Some(start), Some(end), now).unwrap();
        assert_eq!(outcome, SpanOutcome::InvalidRange, "{} -> {}", start, end);
        assert_eq!(outcome.render(), INVALID_RANGE_MSG);
    }
}

#[test]
fn test_today_to_today_counts_down_the_clock() {
    let now = at("2024-06-01", "10:00:00");
    let outcome = compute_span(Some("2024-06-01"), Some("2024-06-01"), now).unwrap();

    let SpanOutcome::Remaining {
        days,
        hours,
        minutes,
    } = outcome
    else {
        panic!("expected a remaining readout, got {:?}", outcome);
    };

    assert_eq!(days, 0);
    assert!((0..=23).contains(&hours));
    assert!((0..=59).contains(&minutes));

    // Whole minutes from 10:00 to the next midnight, within a minute
    let to_midnight = 14 * 60;
    assert!((hours * 60 + minutes - to_midnight).abs() <= 1);
    assert_eq!(outcome.render(), "0d : 13h : 59m");
}

#[test]
fn test_today_start_day_count_is_independent_of_clock() {
    let morning = at("2024-06-01", "08:15:00");
    let evening = at("2024-06-01", "22:45:00");

    for now in [morning, evening] {
        let outcome = compute_span(Some("2024-06-01"), Some("2024-06-04"), now).unwrap();
        let SpanOutcome::Remaining { days, .. } = outcome else {
            panic!("expected a remaining readout, got {:?}", outcome);
        };
        assert_eq!(days, 3);
    }
}

#[test]
fn test_today_plus_three_days_shares_clock_split_with_today_case() {
    let now = at("2024-06-01", "10:00:00");

    let same_day = compute_span(Some("2024-06-01"), Some("2024-06-01"), now).unwrap();
    let three_out = compute_span(Some("2024-06-01"), Some("2024-06-04"), now).unwrap();

    let SpanOutcome::Remaining {
        hours: h1,
        minutes: m1,
        ..
    } = same_day
    else {
        panic!("expected a remaining readout");
    };
    let SpanOutcome::Remaining {
        days,
        hours: h2,
        minutes: m2,
    } = three_out
    else {
        panic!("expected a remaining readout");
    };

    assert_eq!(days, 3);
    assert_eq!((h1, m1), (h2, m2));
}

#[test]
fn test_past_range_is_an_inclusive_day_count() {
    let now = at("2024-06-01", "10:00:00");
    let outcome = compute_span(Some("2024-01-01"), Some("2024-01-06"), now).unwrap();
    assert_eq!(outcome.render(), "6d : 0h : 0m");
}

#[test]
fn test_fixed_clock_calls_are_idempotent() {
    let now = at("2024-06-01", "10:00:00");
    let first = compute_span(Some("2024-01-01"), Some("2024-03-15"), now).unwrap();
    let second = compute_span(Some("2024-01-01"), Some("2024-03-15"), now).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_january_range_counts_both_endpoints() {
    // start 2024-01-01, end 2024-01-05, neither equal to "today"
    let now = at("2024-06-01", "10:00:00");
    let outcome = compute_span(Some("2024-01-01"), Some("2024-01-05"), now).unwrap();
    assert_eq!(outcome.render(), "5d : 0h : 0m");
}

#[test]
fn test_reversed_january_range_renders_sentinel() {
    let now = at("2024-06-01", "10:00:00");
    let outcome = compute_span(Some("2024-01-10"), Some("2024-01-05"), now).unwrap();
    assert_eq!(outcome.render(), "Invalid: End date before start date");
}

#[test]
fn test_unparseable_date_is_a_typed_error() {
    let now = at("2024-06-01", "10:00:00");
    let result = compute_span(Some("soon"), Some("2024-01-05"), now);
    assert_eq!(result, Err(ParseError::Date("soon".to_string())));
}

#[test]
fn test_extra_formats_reach_the_parser() {
    let now = at("2024-06-01", "10:00:00");
    let extra = vec!["%d.%m.%Y".to_string()];

    let outcome =
        compute_span_with_formats(Some("01.01.2024"), Some("05.01.2024"), now, &extra).unwrap();
    assert_eq!(outcome.render(), "5d : 0h : 0m");

    // Same inputs without the extra format fail to parse
    let result = compute_span(Some("01.01.2024"), Some("05.01.2024"), now);
    assert!(result.is_err());
}

#[test]
fn test_year_boundary_spans() {
    let now = at("2024-06-01", "10:00:00");
    let outcome = compute_span(Some("2023-12-30"), Some("2024-01-02"), now).unwrap();
    // Dec 30, 31, Jan 1, 2 inclusive
    assert_eq!(outcome.render(), "4d : 0h : 0m");
}

#[test]
fn test_leap_day_span() {
    let now = at("2024-06-01", "10:00:00");
    // 2024 is a leap year, so Feb 29 sits inside this range
    let outcome = compute_span(Some("2024-02-28"), Some("2024-03-01"), now).unwrap();
    assert_eq!(outcome.render(), "3d : 0h : 0m");
}
