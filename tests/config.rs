use std::time::Duration;
use time::macros::{date, datetime};
use visitmap::{format_unix_utc, Day, ExportOptions, TimeWindow, DEFAULT_API_BASE};

#[test]
fn defaults_match_upstream_limits() {
    let o = ExportOptions::default();
    assert_eq!(o.api_base, DEFAULT_API_BASE);
    assert_eq!(o.venue_page_size, 250);
    assert_eq!(o.checkin_page_size, 250);
    assert_eq!(o.max_venue_pages, 1000);
    assert_eq!(o.max_checkin_pages, 1000);
    assert_eq!(o.request_timeout, Duration::from_secs(15));
    assert_eq!(o.window, TimeWindow::all());
}

#[test]
fn builder_normalizes_inputs() {
    let o = ExportOptions::default()
        .with_api_base(" http://127.0.0.1:9000/v2/ ")
        .with_page_sizes(0, 10);
    assert_eq!(o.api_base, "http://127.0.0.1:9000/v2");
    assert_eq!(o.venue_page_size, 1);
    assert_eq!(o.checkin_page_size, 10);
}

/// The only test touching the process environment.
#[test]
fn env_overlays_options() {
    std::env::set_var("VISITMAP_API_BASE", "http://mock.local/v2/");
    std::env::set_var("VISITMAP_API_VERSION", "20240101");
    std::env::set_var("VISITMAP_TIMEOUT_SECS", "3");
    std::env::set_var("VISITMAP_FROM", "2019-02-03");
    std::env::set_var("VISITMAP_TO", "not-a-date");
    std::env::set_var("VISITMAP_PROGRESS", "off");

    let o = ExportOptions::default().from_env();
    assert_eq!(o.api_base, "http://mock.local/v2");
    assert_eq!(o.api_version, "20240101");
    assert_eq!(o.request_timeout, Duration::from_secs(3));
    assert_eq!(o.window.after, Some(datetime!(2019-02-03 0:00 UTC)));
    assert_eq!(o.window.before, None, "unparseable dates are ignored");
    assert!(!o.progress);

    for k in ["VISITMAP_API_BASE", "VISITMAP_API_VERSION", "VISITMAP_TIMEOUT_SECS", "VISITMAP_FROM", "VISITMAP_TO", "VISITMAP_PROGRESS"] {
        std::env::remove_var(k);
    }
}

#[test]
fn day_parses_and_displays() {
    let d: Day = "2024-02-29".parse().unwrap();
    assert_eq!(d.0, date!(2024 - 02 - 29));
    assert_eq!(d.to_string(), "2024-02-29");
    assert_eq!(d.start_utc().unix_timestamp(), 1709164800);

    assert!("2024-13-01".parse::<Day>().is_err());
    assert!("29/02/2024".parse::<Day>().is_err());
}

#[test]
fn window_renders_query_params_and_label() {
    let w = TimeWindow::new(Some(datetime!(2020-01-01 0:00 UTC)), None);
    assert_eq!(w.query_params(), vec![("afterTimestamp", "1577836800".to_string())]);
    assert_eq!(w.to_string(), "2020-01-01-open");

    assert!(TimeWindow::all().query_params().is_empty());

    let last = TimeWindow::last_years(10);
    let span = last.before_unix().unwrap() - last.after_unix().unwrap();
    assert_eq!(span, 10 * 365 * 86_400);
}

#[test]
fn unix_formatting_is_rfc3339_utc() {
    assert_eq!(format_unix_utc(0), "1970-01-01T00:00:00Z");
    assert_eq!(format_unix_utc(1770785520), "2026-02-11T04:52:00Z");
    assert_eq!(format_unix_utc(i64::MAX), i64::MAX.to_string());
}
