//! Column encodings shared by the repositories.
//!
//! Identifiers are stored as hyphenated UUID text, floors as integers and
//! timestamps as RFC 3339 UTC text with nanoseconds, so that text order is
//! time order.

use std::str::FromStr;

use chrono::SecondsFormat;

use elevator_domain::direction::Direction;
use elevator_domain::floor::Floor;
use elevator_domain::time::Timestamp;

fn decode_error<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

pub(crate) fn decode_id<T>(value: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(value).map_err(decode_error)
}

pub(crate) fn decode_direction(value: &str) -> Result<Direction, sqlx::Error> {
    value.parse().map_err(decode_error)
}

pub(crate) fn encode_floor(floor: Floor) -> i64 {
    i64::from(floor.value())
}

pub(crate) fn decode_floor(value: i64) -> Result<Floor, sqlx::Error> {
    let value = u32::try_from(value).map_err(decode_error)?;
    Floor::try_from(value).map_err(decode_error)
}

pub(crate) fn encode_count(value: u32) -> i64 {
    i64::from(value)
}

pub(crate) fn decode_count(value: i64) -> Result<u32, sqlx::Error> {
    u32::try_from(value).map_err(decode_error)
}

pub(crate) fn encode_timestamp(at: Timestamp) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn decode_timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|at| at.to_utc())
        .map_err(decode_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use elevator_domain::time::now;

    #[test]
    fn should_keep_timestamp_precision() {
        let at = now();
        let decoded = decode_timestamp(&encode_timestamp(at)).unwrap();
        assert_eq!(decoded, at);
    }

    #[test]
    fn should_sort_encoded_timestamps_by_time() {
        let early = now();
        let late = early + chrono::Duration::milliseconds(1500);
        assert!(encode_timestamp(early) < encode_timestamp(late));
    }

    #[test]
    fn should_reject_invalid_floor() {
        assert!(decode_floor(0).is_err());
        assert!(decode_floor(-2).is_err());
        assert_eq!(decode_floor(7).unwrap().value(), 7);
    }
}
