use crate::errors::{CarparkError, ErrorKind};
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Point-in-time dashboard counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_guests: usize,
    pub active_vehicles: usize,
    pub emails_sent: usize,
    pub scheduled_emails: usize,
    /// Placeholder figure: guest count times a fixed per-guest amount.
    pub total_revenue_impact: u64,
}

/// Window analytics are computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    #[default]
    Week,
    Month,
}

impl Period {
    /// Earliest instant still inside the window ending at `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Period::Day => now - Duration::days(1),
            Period::Week => now - Duration::days(7),
            Period::Month => now
                .checked_sub_months(Months::new(1))
                .unwrap_or_else(|| now - Duration::days(30)),
        }
    }

    /// Length of the window ending at `now`, in days.
    pub fn days(&self, now: DateTime<Utc>) -> f64 {
        let span = now - self.cutoff(now);
        span.num_seconds() as f64 / 86_400.0
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Period {
    type Err = CarparkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(CarparkError::new(
                &format!("Unknown analytics period '{}'", other),
                ErrorKind::ValidationError,
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientCount {
    pub email: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub period: Period,
    pub new_guests: usize,
    pub emails_sent: usize,
    pub average_per_day: f64,
    pub top_recipients: Vec<RecipientCount>,
}

/// Collections that can be exported as CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    Guests,
    Emails,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Guests => "guests",
            ExportKind::Emails => "emails",
        }
    }
}

impl FromStr for ExportKind {
    type Err = CarparkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "guests" => Ok(ExportKind::Guests),
            "emails" => Ok(ExportKind::Emails),
            other => Err(CarparkError::new(
                &format!("Unknown export type '{}'", other),
                ErrorKind::InvalidOperation,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_empty_stats_json() {
        let value = serde_json::to_value(Stats::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "totalGuests": 0,
                "activeVehicles": 0,
                "emailsSent": 0,
                "scheduledEmails": 0,
                "totalRevenueImpact": 0
            })
        );
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("day".parse::<Period>().unwrap(), Period::Day);
        assert_eq!("Week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!(" month ".parse::<Period>().unwrap(), Period::Month);
        assert_eq!(
            "year".parse::<Period>().unwrap_err().kind(),
            &ErrorKind::ValidationError
        );
        assert_eq!(Period::default(), Period::Week);
    }

    #[test]
    fn test_period_cutoffs() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        assert_eq!(Period::Day.cutoff(now), Utc.with_ymd_and_hms(2024, 3, 30, 12, 0, 0).unwrap());
        assert_eq!(Period::Week.cutoff(now), Utc.with_ymd_and_hms(2024, 3, 24, 12, 0, 0).unwrap());
        // clamps to the last day of February
        assert_eq!(Period::Month.cutoff(now), Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_period_days() {
        let now = Utc.with_ymd_and_hms(2024, 5, 15, 0, 0, 0).unwrap();
        assert_eq!(Period::Day.days(now), 1.0);
        assert_eq!(Period::Week.days(now), 7.0);
        assert_eq!(Period::Month.days(now), 30.0);
    }

    #[test]
    fn test_export_kind_parsing() {
        assert_eq!("guests".parse::<ExportKind>().unwrap(), ExportKind::Guests);
        assert_eq!("emails".parse::<ExportKind>().unwrap(), ExportKind::Emails);
        assert!("scheduled".parse::<ExportKind>().is_err());
    }

    #[test]
    fn test_analytics_json_shape() {
        let analytics = Analytics {
            period: Period::Week,
            new_guests: 2,
            emails_sent: 7,
            average_per_day: 1.0,
            top_recipients: vec![RecipientCount {
                email: "a@x.com".into(),
                count: 3,
            }],
        };
        let value = serde_json::to_value(analytics).unwrap();
        assert_eq!(value["period"], json!("week"));
        assert_eq!(value["averagePerDay"], json!(1.0));
        assert_eq!(value["topRecipients"][0]["count"], json!(3));
    }
}
