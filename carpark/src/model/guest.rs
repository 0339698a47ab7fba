use crate::common::timestamp;
use crate::model::{merge_extra, merge_field, merge_optional, optional_text, without_reserved, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// assigned by the registry, never taken from caller input
const GENERATED_FIELDS: [&str; 3] = ["id", "registeredAt", "status"];

status_enum! {
    /// Lifecycle status of a registered guest.
    GuestStatus {
        Active => "active",
        CheckedOut => "checked-out",
    }
}

impl Default for GuestStatus {
    fn default() -> Self {
        GuestStatus::Active
    }
}

/// A guest and the vehicle they parked, as stored in the guest collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_text"
    )]
    pub room_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_reg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_spot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub email_reminders: bool,
    #[serde(default)]
    pub email_updates: bool,
    #[serde(with = "timestamp")]
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub status: GuestStatus,
    /// Caller fields the registry does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Guest {
    /// Builds the stored record from caller input and the generated fields.
    pub fn register(input: NewGuest, id: String, registered_at: DateTime<Utc>) -> Guest {
        Guest {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            room_number: input.room_number,
            vehicle_reg: input.vehicle_reg,
            vehicle_make: input.vehicle_make,
            vehicle_color: input.vehicle_color,
            parking_spot: input.parking_spot,
            check_in: input.check_in,
            check_out: input.check_out,
            notes: input.notes,
            email_reminders: input.email_reminders,
            email_updates: input.email_updates,
            registered_at,
            status: GuestStatus::Active,
            extra: without_reserved(input.extra, &GENERATED_FIELDS),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == GuestStatus::Active
    }

    /// Case-insensitive substring match on name, email, vehicle registration
    /// and room number. `needle` must already be lower-cased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        [
            &self.name,
            &self.email,
            &self.vehicle_reg,
            &self.room_number,
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Record for Guest {
    type Update = GuestUpdate;

    fn id(&self) -> &str {
        &self.id
    }

    fn merge(&mut self, update: GuestUpdate) {
        merge_optional(&mut self.name, update.name);
        merge_optional(&mut self.email, update.email);
        merge_optional(&mut self.phone, update.phone);
        merge_optional(&mut self.room_number, update.room_number);
        merge_optional(&mut self.vehicle_reg, update.vehicle_reg);
        merge_optional(&mut self.vehicle_make, update.vehicle_make);
        merge_optional(&mut self.vehicle_color, update.vehicle_color);
        merge_optional(&mut self.parking_spot, update.parking_spot);
        merge_optional(&mut self.check_in, update.check_in);
        merge_optional(&mut self.check_out, update.check_out);
        merge_optional(&mut self.notes, update.notes);
        merge_field(&mut self.email_reminders, update.email_reminders);
        merge_field(&mut self.email_updates, update.email_updates);
        merge_field(&mut self.status, update.status);
        merge_extra(&mut self.extra, without_reserved(update.extra, &GENERATED_FIELDS));
    }
}

/// Registration form input. Identifier, timestamp and status are assigned by the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGuest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_text"
    )]
    pub room_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_reg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_spot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub email_reminders: bool,
    #[serde(default)]
    pub email_updates: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial update for a guest; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_text"
    )]
    pub room_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_reg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_spot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_reminders: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_updates: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GuestStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GuestUpdate {
    pub fn status(status: impl Into<GuestStatus>) -> GuestUpdate {
        GuestUpdate {
            status: Some(status.into()),
            ..GuestUpdate::default()
        }
    }
}
