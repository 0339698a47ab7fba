use chrono::{DateTime, ParseError, SecondsFormat, SubsecRound, Utc};

/// Current instant at the millisecond precision timestamps are stored with.
#[inline]
pub fn current_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[inline]
pub fn current_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Formats an instant as ISO-8601 UTC with milliseconds, e.g. `2024-05-01T09:30:00.000Z`.
#[inline]
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses any RFC 3339 timestamp and normalizes it to UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_rfc3339(text.trim()).map(|dt| dt.with_timezone(&Utc))
}

/// Serde adapter storing `DateTime<Utc>` in the persisted timestamp format.
pub mod timestamp {
    use super::{format_timestamp, parse_timestamp};
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_timestamp(&text)
            .map_err(|err| de::Error::custom(format!("invalid timestamp '{}': {}", text, err)))
    }
}
