use pretty_assertions::assert_eq;

use crate::error::RawLogError;
use crate::parser::{NumericPolicy, ParsedLog, RawLogParser};

const SAMPLE: &str =
    "2024-01-01T00:00:00Z,21.5,1013.2,45.0,400,100,1000,950,1100,50,48";

#[test]
fn test_parse_sample_line() {
    let parsed = RawLogParser::default().parse(SAMPLE).unwrap();
    assert_eq!(
        parsed,
        ParsedLog {
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            temperature: 21.5,
            pressure: 1013.2,
            humidity: 45.0,
            gas: 400.0,
            altitude: 100.0,
            r0: 1000.0,
            corrected_r_zero: 950.0,
            resistance: 1100.0,
            ppm: 50.0,
            corrected_ppm: 48.0,
        }
    );
}

#[test]
fn test_parse_rejects_wrong_field_count() {
    let parser = RawLogParser::default();

    assert_eq!(
        parser.parse("2024-01-01T00:00:00Z,1,2,3").unwrap_err(),
        RawLogError::FieldCount {
            expected: 11,
            found: 4
        }
    );
    assert_eq!(
        parser.parse(&format!("{SAMPLE},7")).unwrap_err(),
        RawLogError::FieldCount {
            expected: 11,
            found: 12
        }
    );
    assert_eq!(
        parser.parse("").unwrap_err(),
        RawLogError::FieldCount {
            expected: 11,
            found: 1
        }
    );
}

#[test]
fn test_timestamp_is_not_validated() {
    let parsed = RawLogParser::default()
        .parse("not a date,1,2,3,4,5,6,7,8,9,10")
        .unwrap();
    assert_eq!(parsed.timestamp, "not a date");
    assert_eq!(parsed.corrected_ppm, 10.0);
}

#[test]
fn test_lenient_policy_yields_nan() {
    let parsed = RawLogParser::new(NumericPolicy::Lenient)
        .parse("t,abc,2,3,4,5,6,7,8,9,")
        .unwrap();
    assert!(parsed.temperature.is_nan());
    assert!(parsed.corrected_ppm.is_nan());
    assert_eq!(parsed.pressure, 2.0);
}

#[test]
fn test_numeric_fields_tolerate_surrounding_whitespace() {
    let parsed = RawLogParser::new(NumericPolicy::Strict)
        .parse(" t, 1,2,3,4,5,6,7,8,9,48\n")
        .unwrap();
    assert_eq!(parsed.timestamp, " t");
    assert_eq!(parsed.temperature, 1.0);
    assert_eq!(parsed.corrected_ppm, 48.0);
}

#[test]
fn test_strict_policy_rejects_non_finite_literals() {
    let parser = RawLogParser::new(NumericPolicy::Strict);

    assert_eq!(
        parser.parse("t,NaN,inf,infinity,4,5,6,7,8,9,10").unwrap_err(),
        RawLogError::InvalidNumber {
            field: "temperature",
            value: "NaN".to_string()
        }
    );
    assert_eq!(
        parser.parse("t,1,2,3,4,5,6,7,8,9,-inf").unwrap_err(),
        RawLogError::InvalidNumber {
            field: "correctedPPM",
            value: "-inf".to_string()
        }
    );
    assert!(parser.parse("t,1,2,3,4,5,6,7,8,9,").is_err());
}

#[test]
fn test_lenient_policy_keeps_non_finite_literals() {
    let parsed = RawLogParser::default()
        .parse("t,NaN,inf,3,4,5,6,7,8,9,10")
        .unwrap();
    assert!(parsed.temperature.is_nan());
    assert_eq!(parsed.pressure, f64::INFINITY);
}

#[test]
fn test_strict_policy_rejects_bad_number() {
    let err = RawLogParser::new(NumericPolicy::Strict)
        .parse("t,1,2,3,4,5,oops,7,8,9,10")
        .unwrap_err();
    assert_eq!(
        err,
        RawLogError::InvalidNumber {
            field: "R0",
            value: "oops".to_string()
        }
    );
}

#[test]
fn test_policy_from_flag() {
    assert_eq!(NumericPolicy::from_strict_flag(true), NumericPolicy::Strict);
    assert_eq!(
        NumericPolicy::from_strict_flag(false),
        NumericPolicy::Lenient
    );
}
