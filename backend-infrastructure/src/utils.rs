use anyhow::{anyhow, Result};
use chrono::{DateTime, TimeZone, Utc};
use time::OffsetDateTime;

/// Millisecond precision, matching the `DateTime64(3)` column.
pub fn to_offset_datetime(value: DateTime<Utc>) -> Result<OffsetDateTime> {
    let nanos = i128::from(value.timestamp_millis()) * 1_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .map_err(|err| anyhow!("timestamp {} out of range: {}", value, err))
}

pub fn to_utc(value: OffsetDateTime) -> Result<DateTime<Utc>> {
    let millis = i64::try_from(value.unix_timestamp_nanos() / 1_000_000)
        .map_err(|_| anyhow!("timestamp {} out of range", value))?;
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| anyhow!("timestamp {} out of range", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_keeps_millisecond_precision() {
        let at = Utc.with_ymd_and_hms(2024, 6, 3, 9, 15, 42).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(to_utc(to_offset_datetime(at).unwrap()).unwrap(), at);
    }

    #[test]
    fn out_of_range_timestamps_are_errors() {
        let far_future = Utc.with_ymd_and_hms(20_000, 1, 1, 0, 0, 0).unwrap();
        assert!(to_offset_datetime(far_future).is_err());
    }
}
