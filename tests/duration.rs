// tests/duration.rs

use std::time::Duration;

use proptest::prelude::*;

use batchsub::errors::BatchsubError;
use batchsub::job::{IntoJobDuration, JobDuration};

#[test]
fn shorthand_units_are_days_hours_minutes() {
    let cases = [
        ("2d", 2 * 86_400),
        ("3h", 3 * 3_600),
        ("45m", 45 * 60),
        ("24", 24 * 3_600),
        ("0", 0),
        (" 12 h ", 12 * 3_600),
    ];

    for (text, seconds) in cases {
        let parsed: JobDuration = text.parse().unwrap();
        assert_eq!(parsed.as_secs(), seconds, "parsing {text:?}");
    }
}

#[test]
fn clock_form_is_parsed_and_hours_are_not_capped() {
    let d: JobDuration = "100:05:09".parse().unwrap();
    assert_eq!(d.as_secs(), 100 * 3600 + 5 * 60 + 9);
    assert_eq!(d.to_hms(), "100:05:09");
}

#[test]
fn formatting_zero_pads_every_component() {
    assert_eq!(JobDuration::from_secs(0).to_hms(), "00:00:00");
    assert_eq!(JobDuration::from_secs(3_661).to_string(), "01:01:01");
    assert_eq!(JobDuration::from_hours(10).to_string(), "10:00:00");
}

#[test]
fn negative_durations_are_rejected() {
    for text in ["-1h", "-3", "-2d"] {
        match text.parse::<JobDuration>() {
            Err(BatchsubError::InvalidDuration(msg)) => {
                assert!(msg.contains("negative"), "unexpected message: {msg}");
            }
            other => panic!("expected InvalidDuration for {text:?}, got {other:?}"),
        }
    }

    assert!(matches!(
        (-5i64).into_job_duration(),
        Err(BatchsubError::InvalidDuration(_))
    ));
}

#[test]
fn malformed_durations_are_rejected() {
    for text in ["", "h", "1w", "1.5h", "ten hours", "10:61:00", "10:00:60", "1:2:3"] {
        assert!(
            matches!(
                text.parse::<JobDuration>(),
                Err(BatchsubError::InvalidDuration(_))
            ),
            "{text:?} should not parse"
        );
    }
}

#[test]
fn conversions_accept_std_duration_and_seconds() {
    let from_std = Duration::from_secs(90).into_job_duration().unwrap();
    assert_eq!(from_std.to_hms(), "00:01:30");

    let from_int = 7_200i64.into_job_duration().unwrap();
    assert_eq!(from_int, JobDuration::from_hours(2));

    let owned = String::from("1d").into_job_duration().unwrap();
    assert_eq!(owned, JobDuration::from_hours(24));
}

#[test]
fn scaling_saturates_instead_of_overflowing() {
    let d = JobDuration::from_secs(u64::MAX / 2);
    assert_eq!(d.scaled(4).as_secs(), u64::MAX);
    assert_eq!(JobDuration::from_hours(10).scaled(4).to_hms(), "40:00:00");
}

proptest! {
    #[test]
    fn formatted_durations_parse_back_to_the_same_seconds(seconds in 0u64..10_000_000_000) {
        let d = JobDuration::from_secs(seconds);
        let text = d.to_hms();
        let parsed: JobDuration = text.parse().unwrap();
        prop_assert_eq!(parsed.as_secs(), seconds);
    }

    #[test]
    fn shorthand_hours_match_from_hours(hours in 0u64..100_000) {
        let parsed: JobDuration = format!("{hours}h").parse().unwrap();
        prop_assert_eq!(parsed, JobDuration::from_hours(hours));
    }
}
