//! The measurement value type and its storage (de)serialization

use crate::{Error, Result, Row, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One temperature reading from one device
///
/// `(device, time)` is unique; writing the same pair twice keeps the later
/// value (the store's last-write-wins merge rule). Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Reporting device, unique per device and not globally ordered
    pub device: Uuid,
    /// When the reading was taken; ascending per device
    pub time: DateTime<Utc>,
    /// The reading, in whatever unit the caller defined
    pub temperature: i16,
}

impl Measurement {
    /// Create a new measurement
    pub fn new(device: Uuid, time: DateTime<Utc>, temperature: i16) -> Self {
        Self {
            device,
            time,
            temperature,
        }
    }

    /// Serialize into insert parameters, in placeholder order
    ///
    /// The order (device, time, temperature) matches both insert statement
    /// templates and must not change independently of them.
    pub fn to_params(&self) -> [Value; 3] {
        [
            Value::Uuid(self.device),
            Value::Timestamp(self.time),
            Value::SmallInt(self.temperature),
        ]
    }

    /// Decode a measurement from a result row
    ///
    /// The only place row decoding happens; a missing column or a column of
    /// the wrong type is a schema drift and fails the whole read.
    pub fn from_row(row: &Row) -> Result<Self> {
        let device = row
            .get("device")
            .ok_or_else(|| missing("device"))?
            .as_uuid()
            .ok_or_else(|| mistyped("device", "uuid"))?;

        let time = row
            .get("time")
            .ok_or_else(|| missing("time"))?
            .as_timestamp()
            .ok_or_else(|| mistyped("time", "timestamp"))?;

        let temperature = row
            .get("temperature")
            .ok_or_else(|| missing("temperature"))?
            .as_smallint()
            .ok_or_else(|| mistyped("temperature", "smallint"))?;

        Ok(Self {
            device,
            time,
            temperature,
        })
    }
}

fn missing(column: &'static str) -> Error {
    Error::Decode {
        column,
        reason: "column missing from row".to_string(),
    }
}

fn mistyped(column: &'static str, expected: &str) -> Error {
    Error::Decode {
        column,
        reason: format!("expected {expected}"),
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {}: {}",
            self.device,
            self.time.to_rfc3339(),
            self.temperature
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Measurement {
        Measurement::new(
            Uuid::new_v4(),
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            21,
        )
    }

    fn row_from(m: &Measurement) -> Row {
        let [device, time, temperature] = m.to_params();
        Row::new(vec![
            ("device".to_string(), device),
            ("time".to_string(), time),
            ("temperature".to_string(), temperature),
        ])
    }

    #[test]
    fn test_params_in_placeholder_order() {
        let m = sample();
        let [p0, p1, p2] = m.to_params();
        assert_eq!(p0, Value::Uuid(m.device));
        assert_eq!(p1, Value::Timestamp(m.time));
        assert_eq!(p2, Value::SmallInt(m.temperature));
    }

    #[test]
    fn test_row_round_trip() {
        let m = sample();
        assert_eq!(Measurement::from_row(&row_from(&m)).unwrap(), m);
    }

    #[test]
    fn test_missing_column_fails_decode() {
        let row = Row::new(vec![
            ("device".to_string(), Value::Uuid(Uuid::new_v4())),
            ("temperature".to_string(), Value::SmallInt(3)),
        ]);
        let err = Measurement::from_row(&row).unwrap_err();
        assert!(matches!(err, Error::Decode { column: "time", .. }));
    }

    #[test]
    fn test_mistyped_column_fails_decode() {
        let m = sample();
        let row = Row::new(vec![
            ("device".to_string(), Value::Uuid(m.device)),
            ("time".to_string(), Value::Timestamp(m.time)),
            // temperature carrying a uuid, as after a bad schema migration
            ("temperature".to_string(), Value::Uuid(Uuid::new_v4())),
        ]);
        let err = Measurement::from_row(&row).unwrap_err();
        assert!(matches!(err, Error::Decode { column: "temperature", .. }));
    }
}
