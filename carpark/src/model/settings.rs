use crate::common::{
    DEFAULT_AUTO_REMINDERS, DEFAULT_BUSINESS_END, DEFAULT_BUSINESS_START, DEFAULT_EMAIL_FROM,
    DEFAULT_HOTEL_NAME, DEFAULT_REMINDER_HOURS,
};
use crate::model::{merge_extra, merge_field};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub start: String,
    pub end: String,
}

impl Default for BusinessHours {
    fn default() -> Self {
        BusinessHours {
            start: DEFAULT_BUSINESS_START.to_string(),
            end: DEFAULT_BUSINESS_END.to_string(),
        }
    }
}

/// The registry's single settings record.
///
/// Missing fields in stored data fall back to their defaults. Keys the
/// registry does not know are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub hotel_name: String,
    pub email_from: String,
    pub business_hours: BusinessHours,
    pub auto_reminders: bool,
    pub reminder_hours: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            hotel_name: DEFAULT_HOTEL_NAME.to_string(),
            email_from: DEFAULT_EMAIL_FROM.to_string(),
            business_hours: BusinessHours::default(),
            auto_reminders: DEFAULT_AUTO_REMINDERS,
            reminder_hours: DEFAULT_REMINDER_HOURS,
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// Merges `update` field by field. `businessHours` is replaced as a whole.
    pub fn merge(&mut self, update: SettingsUpdate) {
        merge_field(&mut self.hotel_name, update.hotel_name);
        merge_field(&mut self.email_from, update.email_from);
        merge_field(&mut self.business_hours, update.business_hours);
        merge_field(&mut self.auto_reminders, update.auto_reminders);
        merge_field(&mut self.reminder_hours, update.reminder_hours);
        merge_extra(&mut self.extra, update.extra);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_hours: Option<BusinessHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_reminders: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_hours: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
