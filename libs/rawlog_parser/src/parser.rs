use crate::error::{RawLogError, RawLogResult};

/// Number of comma separated fields in a raw log line.
pub const FIELD_COUNT: usize = 11;

/// Names of the numeric fields, in line order after the timestamp.
pub const NUMERIC_FIELDS: [&str; FIELD_COUNT - 1] = [
    "temperature",
    "pressure",
    "humidity",
    "gas",
    "altitude",
    "R0",
    "correctedRZero",
    "resistance",
    "ppm",
    "correctedPPM",
];

/// How numeric fields that fail to parse are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumericPolicy {
    /// Unparsable fields become `NaN` and the line is still accepted.
    #[default]
    Lenient,
    /// Unparsable fields reject the whole line.
    Strict,
}

impl NumericPolicy {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            NumericPolicy::Strict
        } else {
            NumericPolicy::Lenient
        }
    }
}

/// A microcontroller log line split into its positional fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLog {
    /// First field, kept verbatim. Never validated as a date.
    pub timestamp: String,
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub gas: f64,
    pub altitude: f64,
    pub r0: f64,
    pub corrected_r_zero: f64,
    pub resistance: f64,
    pub ppm: f64,
    pub corrected_ppm: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RawLogParser {
    policy: NumericPolicy,
}

impl RawLogParser {
    pub fn new(policy: NumericPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> NumericPolicy {
        self.policy
    }

    /// Splits `line` on literal commas and coerces fields 1..=10 to `f64`.
    ///
    /// No quoting or escaping is applied and fields are not trimmed during
    /// the split. The timestamp keeps any surrounding whitespace.
    pub fn parse(&self, line: &str) -> RawLogResult<ParsedLog> {
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() != FIELD_COUNT {
            return Err(RawLogError::FieldCount {
                expected: FIELD_COUNT,
                found: parts.len(),
            });
        }

        let mut values = [0f64; FIELD_COUNT - 1];
        for (slot, (&field, raw)) in values
            .iter_mut()
            .zip(NUMERIC_FIELDS.iter().zip(&parts[1..]))
        {
            *slot = self.coerce(field, raw)?;
        }

        let [
            temperature,
            pressure,
            humidity,
            gas,
            altitude,
            r0,
            corrected_r_zero,
            resistance,
            ppm,
            corrected_ppm,
        ] = values;

        Ok(ParsedLog {
            timestamp: parts[0].to_string(),
            temperature,
            pressure,
            humidity,
            gas,
            altitude,
            r0,
            corrected_r_zero,
            resistance,
            ppm,
            corrected_ppm,
        })
    }

    /// Surrounding whitespace is ignored. Under [`NumericPolicy::Strict`]
    /// the literals `NaN` and `inf` are rejected along with anything else
    /// that does not yield a finite number.
    fn coerce(&self, field: &'static str, raw: &str) -> RawLogResult<f64> {
        let parsed = raw.trim().parse::<f64>().ok();
        match (self.policy, parsed) {
            (NumericPolicy::Lenient, value) => Ok(value.unwrap_or(f64::NAN)),
            (NumericPolicy::Strict, Some(value)) if value.is_finite() => {
                Ok(value)
            }
            (NumericPolicy::Strict, _) => Err(RawLogError::InvalidNumber {
                field,
                value: raw.to_string(),
            }),
        }
    }
}
