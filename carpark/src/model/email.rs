use crate::common::timestamp;
use crate::model::{merge_extra, merge_field, merge_optional, without_reserved, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// assigned by the registry, never taken from caller input
const GENERATED_FIELDS: [&str; 3] = ["id", "sentAt", "status"];

status_enum! {
    /// Delivery status of a sent e-mail record.
    EmailStatus {
        Sent => "sent",
        Failed => "failed",
    }
}

impl Default for EmailStatus {
    fn default() -> Self {
        EmailStatus::Sent
    }
}

/// A sent e-mail. Recipients are plain addresses with no link to guest records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(with = "timestamp")]
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub status: EmailStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Email {
    pub fn record(input: NewEmail, id: String, sent_at: DateTime<Utc>) -> Email {
        Email {
            id,
            recipients: input.recipients,
            subject: input.subject,
            body: input.body,
            sent_at,
            status: EmailStatus::Sent,
            extra: without_reserved(input.extra, &GENERATED_FIELDS),
        }
    }
}

impl Record for Email {
    type Update = EmailUpdate;

    fn id(&self) -> &str {
        &self.id
    }

    fn merge(&mut self, update: EmailUpdate) {
        merge_field(&mut self.recipients, update.recipients);
        merge_optional(&mut self.subject, update.subject);
        merge_optional(&mut self.body, update.body);
        merge_field(&mut self.status, update.status);
        merge_extra(&mut self.extra, without_reserved(update.extra, &GENERATED_FIELDS));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmail {
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewEmail {
    pub fn new<I, S>(recipients: I, subject: &str, body: &str) -> NewEmail
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NewEmail {
            recipients: recipients.into_iter().map(Into::into).collect(),
            subject: Some(subject.to_string()),
            body: Some(body.to_string()),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EmailStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
