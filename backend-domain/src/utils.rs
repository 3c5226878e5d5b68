use chrono::{DateTime, Utc};

/// Whole minutes elapsed from `start` to `end`, rounded down. Never negative.
pub fn whole_minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let minutes = (end - start).num_minutes();
    u32::try_from(minutes.max(0)).unwrap_or(u32::MAX)
}

pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn minutes_are_floored() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        assert_eq!(whole_minutes_between(start, start + Duration::seconds(59)), 0);
        assert_eq!(whole_minutes_between(start, start + Duration::seconds(7_559)), 125);
        assert_eq!(whole_minutes_between(start + Duration::minutes(3), start), 0);
    }

    #[test]
    fn blank_text_becomes_none() {
        assert_eq!(normalize_optional_text(Some("   ".to_string())), None);
        assert_eq!(
            normalize_optional_text(Some(" broken hinge ".to_string())),
            Some("broken hinge".to_string())
        );
    }
}
