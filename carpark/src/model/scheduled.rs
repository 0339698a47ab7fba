use crate::common::timestamp;
use crate::model::{merge_extra, merge_field, merge_optional, without_reserved, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// assigned by the registry, never taken from caller input
const GENERATED_FIELDS: [&str; 3] = ["id", "createdAt", "status"];

status_enum! {
    /// Status of an e-mail waiting to be sent.
    ScheduledEmailStatus {
        Pending => "pending",
        Sent => "sent",
        Cancelled => "cancelled",
    }
}

impl Default for ScheduledEmailStatus {
    fn default() -> Self {
        ScheduledEmailStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledEmail {
    pub id: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// When the caller wants the e-mail sent, in the caller's own format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: ScheduledEmailStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScheduledEmail {
    pub fn schedule(input: NewScheduledEmail, id: String, created_at: DateTime<Utc>) -> ScheduledEmail {
        ScheduledEmail {
            id,
            recipients: input.recipients,
            subject: input.subject,
            body: input.body,
            scheduled_for: input.scheduled_for,
            created_at,
            status: ScheduledEmailStatus::Pending,
            extra: without_reserved(input.extra, &GENERATED_FIELDS),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ScheduledEmailStatus::Pending
    }
}

impl Record for ScheduledEmail {
    type Update = ScheduledEmailUpdate;

    fn id(&self) -> &str {
        &self.id
    }

    fn merge(&mut self, update: ScheduledEmailUpdate) {
        merge_field(&mut self.recipients, update.recipients);
        merge_optional(&mut self.subject, update.subject);
        merge_optional(&mut self.body, update.body);
        merge_optional(&mut self.scheduled_for, update.scheduled_for);
        merge_field(&mut self.status, update.status);
        merge_extra(&mut self.extra, without_reserved(update.extra, &GENERATED_FIELDS));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduledEmail {
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledEmailUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ScheduledEmailStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScheduledEmailUpdate {
    pub fn status(status: impl Into<ScheduledEmailStatus>) -> ScheduledEmailUpdate {
        ScheduledEmailUpdate {
            status: Some(status.into()),
            ..ScheduledEmailUpdate::default()
        }
    }
}
