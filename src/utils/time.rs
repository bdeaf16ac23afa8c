use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Naive date-time shapes accepted on input, tried in order
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Shape used by `datetime-local` form inputs
pub const FORM_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Parse a timestamp in any of the accepted shapes.
///
/// RFC 3339 values keep their offset and are converted to UTC. Naive
/// date-times and bare dates carry no zone and are read as UTC, a bare
/// date meaning midnight.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format a timestamp for a `datetime-local` form field (minute precision)
pub fn format_form_timestamp(value: &DateTime<Utc>) -> String {
    value.format(FORM_FORMAT).to_string()
}

/// Serde helpers for `Option<DateTime<Utc>>` fields that accept every
/// shape [`parse_timestamp`] does. `null` and absent both read as `None`.
pub mod flexible_option {
    use super::parse_timestamp;
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse_timestamp(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {:?}", raw))),
            None => Ok(None),
        }
    }
}
