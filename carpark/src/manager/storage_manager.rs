use crate::carpark_builder::StorageManagerBuilder;
use crate::carpark_config::CarparkConfig;
use crate::common::{
    current_time, IdGenerator, COLLECTION_KEYS, EMAILS_KEY, EMPTY_COLLECTION, GUESTS_KEY,
    SCHEDULED_KEY, SETTINGS_KEY,
};
use crate::errors::CarparkResult;
use crate::model::{
    Email, EmailUpdate, Guest, GuestUpdate, NewEmail, NewGuest, NewScheduledEmail, Record,
    ScheduledEmail, ScheduledEmailUpdate, Settings, SettingsUpdate,
};
use crate::store::KeyValueStore;
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Storage layer of the car-park registry.
///
/// `StorageManager` owns a key-value backend and keeps four JSON values in it:
/// the guest, e-mail and scheduled e-mail collections and the settings record.
/// Each operation reads the whole collection, applies its change and writes
/// the collection back.
///
/// Clones share the same backend and write lock, so a manager can be handed
/// to several threads. Read-modify-write sequences hold the lock for their
/// whole duration; separate operations are not atomic with respect to each
/// other.
///
/// The backend is committed and closed when the last clone is dropped, or
/// explicitly through `close()`.
///
/// # Examples
///
/// ```rust,ignore
/// use carpark::manager::StorageManager;
/// use carpark::model::{GuestUpdate, NewGuest};
///
/// let manager = StorageManager::builder().open()?;
/// let guest = manager.add_guest(NewGuest {
///     name: Some("Jane Doe".into()),
///     vehicle_reg: Some("XYZ1".into()),
///     ..NewGuest::default()
/// })?;
/// manager.update_guest(&guest.id, GuestUpdate::status("checked-out"))?;
/// ```
#[derive(Clone)]
pub struct StorageManager {
    inner: Arc<StorageManagerInner>,
}

impl StorageManager {
    pub fn builder() -> StorageManagerBuilder {
        StorageManagerBuilder::new()
    }

    pub(crate) fn new(config: CarparkConfig, store: KeyValueStore) -> Self {
        StorageManager {
            inner: Arc::new(StorageManagerInner::new(config, store)),
        }
    }

    pub fn config(&self) -> CarparkConfig {
        self.inner.config.clone()
    }

    /// Creates every missing collection as `[]` and writes the default
    /// settings if none exist. Existing values are left untouched.
    pub fn initialize_storage(&self) -> CarparkResult<()> {
        let _guard = self.lock();
        self.inner.initialize_storage()
    }

    pub fn add_guest(&self, guest: NewGuest) -> CarparkResult<Guest> {
        let record = Guest::register(guest, self.inner.next_id(), current_time());
        self.insert(GUESTS_KEY, record)
    }

    /// All guests in insertion order. A missing or unreadable collection is empty.
    pub fn get_guests(&self) -> CarparkResult<Vec<Guest>> {
        self.read_collection(GUESTS_KEY)
    }

    pub fn get_guest_by_id(&self, id: &str) -> CarparkResult<Option<Guest>> {
        self.find_by_id(GUESTS_KEY, id)
    }

    /// Merges `update` into the guest with `id` and returns the merged record,
    /// or `None` without writing anything if no guest has that id.
    pub fn update_guest(&self, id: &str, update: GuestUpdate) -> CarparkResult<Option<Guest>> {
        self.update(GUESTS_KEY, id, update)
    }

    /// Removes every guest with `id`. Returns whether any was removed.
    pub fn delete_guest(&self, id: &str) -> CarparkResult<bool> {
        self.delete(GUESTS_KEY, id)
    }

    pub fn add_email(&self, email: NewEmail) -> CarparkResult<Email> {
        let record = Email::record(email, self.inner.next_id(), current_time());
        self.insert(EMAILS_KEY, record)
    }

    pub fn get_emails(&self) -> CarparkResult<Vec<Email>> {
        self.read_collection(EMAILS_KEY)
    }

    pub fn get_email_by_id(&self, id: &str) -> CarparkResult<Option<Email>> {
        self.find_by_id(EMAILS_KEY, id)
    }

    pub fn update_email(&self, id: &str, update: EmailUpdate) -> CarparkResult<Option<Email>> {
        self.update(EMAILS_KEY, id, update)
    }

    pub fn delete_email(&self, id: &str) -> CarparkResult<bool> {
        self.delete(EMAILS_KEY, id)
    }

    pub fn add_scheduled_email(&self, email: NewScheduledEmail) -> CarparkResult<ScheduledEmail> {
        let record = ScheduledEmail::schedule(email, self.inner.next_id(), current_time());
        self.insert(SCHEDULED_KEY, record)
    }

    pub fn get_scheduled_emails(&self) -> CarparkResult<Vec<ScheduledEmail>> {
        self.read_collection(SCHEDULED_KEY)
    }

    pub fn get_scheduled_email_by_id(&self, id: &str) -> CarparkResult<Option<ScheduledEmail>> {
        self.find_by_id(SCHEDULED_KEY, id)
    }

    pub fn update_scheduled_email(
        &self,
        id: &str,
        update: ScheduledEmailUpdate,
    ) -> CarparkResult<Option<ScheduledEmail>> {
        self.update(SCHEDULED_KEY, id, update)
    }

    pub fn delete_scheduled_email(&self, id: &str) -> CarparkResult<bool> {
        self.delete(SCHEDULED_KEY, id)
    }

    /// The settings record; the configured defaults if it is missing or unreadable.
    pub fn get_settings(&self) -> CarparkResult<Settings> {
        self.inner.read_settings()
    }

    pub fn update_settings(&self, update: SettingsUpdate) -> CarparkResult<Settings> {
        let _guard = self.lock();
        let mut settings = self.inner.read_settings()?;
        settings.merge(update);
        self.write_value(SETTINGS_KEY, &settings)?;
        Ok(settings)
    }

    /// Overwrites the settings record with the configured defaults.
    pub fn reset_settings(&self) -> CarparkResult<Settings> {
        let _guard = self.lock();
        let settings = self.inner.config.default_settings();
        self.write_value(SETTINGS_KEY, &settings)?;
        log::info!("Settings reset to defaults");
        Ok(settings)
    }

    /// Removes the guest, e-mail and scheduled e-mail collections and
    /// re-creates them empty. Settings are kept.
    pub fn clear_all_data(&self) -> CarparkResult<()> {
        let _guard = self.lock();
        for key in COLLECTION_KEYS {
            self.inner.store.remove_item(key)?;
        }
        self.inner.initialize_storage()?;
        log::info!("All guest and e-mail data cleared");
        Ok(())
    }

    /// Flushes pending writes to the backend.
    pub fn commit(&self) -> CarparkResult<()> {
        self.inner.store.commit()
    }

    /// Commits (unless disabled in the configuration) and closes the backend.
    /// Closing an already closed manager is a no-op.
    pub fn close(&self) -> CarparkResult<()> {
        self.inner.close()
    }

    pub fn is_closed(&self) -> CarparkResult<bool> {
        self.inner.store.is_closed()
    }

    /// Backend name and version, e.g. `InMemory/0.1.0`.
    pub fn store_version(&self) -> CarparkResult<String> {
        self.inner.store.store_version()
    }

    #[inline]
    pub(crate) fn lock(&self) -> MutexGuard<'_, ()> {
        self.inner.write_lock.lock()
    }

    pub(crate) fn read_collection<T: Record>(&self, key: &str) -> CarparkResult<Vec<T>> {
        self.inner.read_collection(key)
    }

    pub(crate) fn write_value<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CarparkResult<()> {
        self.inner.write_value(key, value)
    }

    fn find_by_id<T: Record>(&self, key: &str, id: &str) -> CarparkResult<Option<T>> {
        let records: Vec<T> = self.read_collection(key)?;
        Ok(records.into_iter().find(|record| record.id() == id))
    }

    fn insert<T: Record>(&self, key: &str, record: T) -> CarparkResult<T> {
        let _guard = self.lock();
        let mut items = self.inner.read_items(key)?;
        items.push(serde_json::to_value(&record)?);
        self.write_value(key, &items)?;
        log::debug!("Added record {} to {}", record.id(), key);
        Ok(record)
    }

    // Works on the raw items so that records this build cannot read are
    // written back unchanged.
    fn update<T: Record>(&self, key: &str, id: &str, update: T::Update) -> CarparkResult<Option<T>> {
        let _guard = self.lock();
        let mut items = self.inner.read_items(key)?;

        let mut found = None;
        for (position, item) in items.iter().enumerate() {
            if item_id(item) != Some(id) {
                continue;
            }
            match serde_json::from_value::<T>(item.clone()) {
                Ok(record) => {
                    found = Some((position, record));
                    break;
                }
                Err(err) => {
                    log::warn!("Record {} in {} is unreadable, not updating it: {}", id, key, err);
                }
            }
        }

        let (position, mut record) = match found {
            Some(found) => found,
            None => {
                log::debug!("No record {} in {} to update", id, key);
                return Ok(None);
            }
        };
        record.merge(update);
        items[position] = serde_json::to_value(&record)?;
        self.write_value(key, &items)?;
        log::debug!("Updated record {} in {}", id, key);
        Ok(Some(record))
    }

    fn delete(&self, key: &str, id: &str) -> CarparkResult<bool> {
        let _guard = self.lock();
        let mut items = self.inner.read_items(key)?;
        let before = items.len();
        items.retain(|item| item_id(item) != Some(id));
        let removed = before - items.len();
        self.write_value(key, &items)?;
        log::debug!("Deleted {} record(s) with id {} from {}", removed, id, key);
        Ok(removed > 0)
    }
}

struct StorageManagerInner {
    config: CarparkConfig,
    store: KeyValueStore,
    id_generator: IdGenerator,
    write_lock: Mutex<()>,
    closed: AtomicBool,
}

impl StorageManagerInner {
    fn new(config: CarparkConfig, store: KeyValueStore) -> Self {
        StorageManagerInner {
            config,
            store,
            id_generator: IdGenerator::new(),
            write_lock: Mutex::new(()),
            closed: AtomicBool::new(false),
        }
    }

    #[inline]
    fn next_id(&self) -> String {
        self.id_generator.next_id()
    }

    // caller holds the write lock
    fn initialize_storage(&self) -> CarparkResult<()> {
        let mut created = Vec::new();
        for key in COLLECTION_KEYS {
            if !self.store.has_item(key)? {
                self.store.set_item(key, EMPTY_COLLECTION)?;
                created.push(key);
            }
        }
        if !self.store.has_item(SETTINGS_KEY)? {
            self.write_value(SETTINGS_KEY, &self.config.default_settings())?;
            created.push(SETTINGS_KEY);
        }

        if !created.is_empty() {
            log::info!("Initialized storage keys: {}", created.join(", "));
        }
        Ok(())
    }

    fn read_items(&self, key: &str) -> CarparkResult<Vec<Value>> {
        let text = match self.store.get_item(key)? {
            Some(text) => text,
            None => {
                log::warn!("Collection {} is missing, treating it as empty", key);
                return Ok(Vec::new());
            }
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(other) => {
                log::warn!("Collection {} holds {} instead of a list, treating it as empty", key, json_kind(&other));
                Ok(Vec::new())
            }
            Err(err) => {
                log::warn!("Collection {} is not valid JSON, treating it as empty: {}", key, err);
                Ok(Vec::new())
            }
        }
    }

    fn read_collection<T: Record>(&self, key: &str) -> CarparkResult<Vec<T>> {
        let items = self.read_items(key)?;
        let mut records = Vec::with_capacity(items.len());
        for (position, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<T>(item) {
                Ok(record) => records.push(record),
                Err(err) => {
                    log::warn!("Skipping unreadable record {} in {}: {}", position, key, err);
                }
            }
        }
        Ok(records)
    }

    fn read_settings(&self) -> CarparkResult<Settings> {
        match self.store.get_item(SETTINGS_KEY)? {
            Some(text) => match serde_json::from_str::<Settings>(&text) {
                Ok(settings) => Ok(settings),
                Err(err) => {
                    log::warn!("Settings are unreadable, using defaults: {}", err);
                    Ok(self.config.default_settings())
                }
            },
            None => {
                log::warn!("Settings are missing, using defaults");
                Ok(self.config.default_settings())
            }
        }
    }

    fn write_value<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CarparkResult<()> {
        let text = serde_json::to_string(value)?;
        self.store.set_item(key, &text).map_err(|err| {
            log::error!("Failed to write {}: {}", key, err);
            err
        })
    }

    fn close(&self) -> CarparkResult<()> {
        if self.closed.swap(true, Ordering::Relaxed) {
            return Ok(());
        }
        if self.config.commit_on_close() {
            self.store.commit()?;
        }
        self.store.close()?;
        log::debug!("Storage manager closed");
        Ok(())
    }
}

// Runs when the last clone of the manager goes away.
impl Drop for StorageManagerInner {
    fn drop(&mut self) {
        if !self.closed.load(Ordering::Relaxed) {
            if let Err(err) = self.close() {
                log::error!("Failed to close store on drop: {}", err);
            }
        }
    }
}

fn item_id(item: &Value) -> Option<&str> {
    item.get("id").and_then(Value::as_str)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::model::{BusinessHours, GuestStatus, ScheduledEmailStatus};
    use crate::store::memory::InMemoryStoreModule;
    use serde_json::json;
    use std::thread;

    fn manager() -> StorageManager {
        StorageManager::builder().open().unwrap()
    }

    fn seeded(key: &str, value: &str) -> StorageManager {
        StorageManager::builder()
            .load_module(InMemoryStoreModule::with_config().seed(key, value).build())
            .open()
            .unwrap()
    }

    fn jane() -> NewGuest {
        NewGuest {
            name: Some("Jane Doe".into()),
            email: Some("j@x.com".into()),
            room_number: Some("12".into()),
            vehicle_reg: Some("XYZ1".into()),
            ..NewGuest::default()
        }
    }

    #[test]
    fn test_open_initializes_every_key() {
        let manager = manager();
        let store = manager.config().store().unwrap();
        for key in COLLECTION_KEYS {
            assert_eq!(store.get_item(key).unwrap().as_deref(), Some("[]"));
        }
        let settings: Settings =
            serde_json::from_str(&store.get_item(SETTINGS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let manager = manager();
        manager.add_guest(jane()).unwrap();
        manager
            .update_settings(SettingsUpdate {
                hotel_name: Some("Harbour Inn".into()),
                ..SettingsUpdate::default()
            })
            .unwrap();

        manager.initialize_storage().unwrap();
        manager.initialize_storage().unwrap();

        assert_eq!(manager.get_guests().unwrap().len(), 1);
        assert_eq!(manager.get_settings().unwrap().hotel_name, "Harbour Inn");
    }

    #[test]
    fn test_initialize_keeps_existing_values() {
        let manager = seeded(GUESTS_KEY, "not json");
        let store = manager.config().store().unwrap();
        assert_eq!(store.get_item(GUESTS_KEY).unwrap().as_deref(), Some("not json"));
        assert_eq!(store.get_item(EMAILS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_add_then_get_by_id() {
        let manager = manager();
        let input = jane();
        let added = manager.add_guest(input.clone()).unwrap();

        let fetched = manager.get_guest_by_id(&added.id).unwrap().unwrap();
        assert_eq!(fetched, added);
        assert_eq!(fetched.status, GuestStatus::Active);
        assert_eq!(fetched.name, input.name);
        assert_eq!(fetched.vehicle_reg, input.vehicle_reg);
        assert!(!fetched.id.is_empty());
    }

    #[test]
    fn test_get_by_unknown_id() {
        let manager = manager();
        manager.add_guest(jane()).unwrap();
        assert!(manager.get_guest_by_id("nope").unwrap().is_none());
    }

    #[test]
    fn test_guests_keep_insertion_order() {
        let manager = manager();
        let ids: Vec<String> = (0..5)
            .map(|i| {
                manager
                    .add_guest(NewGuest {
                        name: Some(format!("Guest {}", i)),
                        ..NewGuest::default()
                    })
                    .unwrap()
                    .id
            })
            .collect();
        let stored: Vec<String> = manager.get_guests().unwrap().into_iter().map(|g| g.id).collect();
        assert_eq!(stored, ids);
    }

    #[test]
    fn test_update_status_changes_only_status() {
        let manager = manager();
        let added = manager.add_guest(jane()).unwrap();

        let updated = manager
            .update_guest(&added.id, GuestUpdate::status(GuestStatus::CheckedOut))
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, GuestStatus::CheckedOut);

        let mut expected = added.clone();
        expected.status = GuestStatus::CheckedOut;
        assert_eq!(manager.get_guest_by_id(&added.id).unwrap().unwrap(), expected);
    }

    #[test]
    fn test_update_unknown_id_writes_nothing() {
        let manager = manager();
        manager.add_guest(jane()).unwrap();
        let store = manager.config().store().unwrap();
        let before = store.get_item(GUESTS_KEY).unwrap();

        let result = manager.update_guest("nope", GuestUpdate::status("checked-out")).unwrap();
        assert!(result.is_none());
        assert_eq!(store.get_item(GUESTS_KEY).unwrap(), before);
    }

    #[test]
    fn test_delete_guest() {
        let manager = manager();
        let first = manager.add_guest(jane()).unwrap();
        manager.add_guest(jane()).unwrap();

        assert!(manager.delete_guest(&first.id).unwrap());
        assert!(manager.get_guest_by_id(&first.id).unwrap().is_none());
        assert_eq!(manager.get_guests().unwrap().len(), 1);

        assert!(!manager.delete_guest(&first.id).unwrap());
        assert_eq!(manager.get_guests().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_removes_duplicate_ids() {
        let manager = seeded(
            GUESTS_KEY,
            r#"[{"id":"dup","registeredAt":"2024-05-01T09:30:00.000Z"},
                {"id":"dup","registeredAt":"2024-05-01T09:31:00.000Z"},
                {"id":"other","registeredAt":"2024-05-01T09:32:00.000Z"}]"#,
        );
        assert!(manager.delete_guest("dup").unwrap());
        let left = manager.get_guests().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, "other");
    }

    #[test]
    fn test_corrupt_collection_reads_empty() {
        let manager = seeded(GUESTS_KEY, "{broken");
        assert!(manager.get_guests().unwrap().is_empty());

        let manager = seeded(EMAILS_KEY, r#"{"id":"e1"}"#);
        assert!(manager.get_emails().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_records_are_skipped() {
        let manager = seeded(
            GUESTS_KEY,
            r#"[{"id":"g1","registeredAt":"2024-05-01T09:30:00.000Z"}, {"id":"g2"}, 42]"#,
        );
        let guests = manager.get_guests().unwrap();
        assert_eq!(guests.len(), 1);
        assert_eq!(guests[0].id, "g1");
    }

    #[test]
    fn test_writes_keep_unreadable_records() {
        let legacy = json!({"id": "legacy", "name": "Old", "registeredAt": "yesterday"});
        let manager = seeded(GUESTS_KEY, &json!([legacy.clone()]).to_string());
        assert!(manager.get_guests().unwrap().is_empty());

        let first = manager.add_guest(jane()).unwrap();
        let second = manager.add_guest(NewGuest::default()).unwrap();
        manager.update_guest(&first.id, GuestUpdate::status(GuestStatus::CheckedOut)).unwrap();
        assert!(manager.delete_guest(&second.id).unwrap());
        assert!(manager.update_guest("legacy", GuestUpdate::default()).unwrap().is_none());

        let text = manager.config().store().unwrap().get_item(GUESTS_KEY).unwrap().unwrap();
        let items: Vec<Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], legacy);
        assert_eq!(items[1]["id"], json!(first.id));
        assert_eq!(items[1]["status"], json!("checked-out"));

        assert!(manager.delete_guest("legacy").unwrap());
        assert_eq!(manager.get_guests().unwrap().len(), 1);
    }

    #[test]
    fn test_update_keeps_generated_fields() {
        let manager = manager();
        let guest = manager.add_guest(jane()).unwrap();

        let mut patch = serde_json::to_value(&guest).unwrap();
        patch["id"] = json!("hijack");
        patch["registeredAt"] = json!("yesterday");
        patch["name"] = json!("Jane Smith");
        let updated = manager
            .update_guest(&guest.id, serde_json::from_value(patch).unwrap())
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, guest.id);
        assert_eq!(updated.registered_at, guest.registered_at);
        assert_eq!(updated.name.as_deref(), Some("Jane Smith"));
        assert_eq!(manager.get_guests().unwrap(), vec![updated]);
        assert!(manager.get_guest_by_id("hijack").unwrap().is_none());

        let text = manager.config().store().unwrap().get_item(GUESTS_KEY).unwrap().unwrap();
        assert!(!text.contains("hijack"));
        assert!(!text.contains("yesterday"));
    }

    #[test]
    fn test_missing_collection_reads_empty() {
        let manager = manager();
        manager.config().store().unwrap().remove_item(SCHEDULED_KEY).unwrap();
        assert!(manager.get_scheduled_emails().unwrap().is_empty());
    }

    #[test]
    fn test_email_operations() {
        let manager = manager();
        let email = manager
            .add_email(NewEmail::new(["a@x.com", "b@x.com"], "Welcome", "Enjoy your stay"))
            .unwrap();
        assert_eq!(email.status.as_str(), "sent");
        assert_eq!(manager.get_email_by_id(&email.id).unwrap(), Some(email.clone()));

        let updated = manager
            .update_email(
                &email.id,
                EmailUpdate {
                    subject: Some("Welcome back".into()),
                    ..EmailUpdate::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.subject.as_deref(), Some("Welcome back"));
        assert_eq!(updated.recipients, email.recipients);

        assert!(manager.delete_email(&email.id).unwrap());
        assert!(manager.get_emails().unwrap().is_empty());
    }

    #[test]
    fn test_scheduled_email_operations() {
        let manager = manager();
        let scheduled = manager
            .add_scheduled_email(NewScheduledEmail {
                recipients: vec!["guest@x.com".into()],
                subject: Some("Reminder".into()),
                scheduled_for: Some("2024-05-02T09:00".into()),
                ..NewScheduledEmail::default()
            })
            .unwrap();
        assert!(scheduled.is_pending());

        let cancelled = manager
            .update_scheduled_email(&scheduled.id, ScheduledEmailUpdate::status("cancelled"))
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status, ScheduledEmailStatus::Cancelled);
        assert_eq!(manager.get_scheduled_emails().unwrap(), vec![cancelled]);

        assert!(manager.delete_scheduled_email(&scheduled.id).unwrap());
        assert!(manager.get_scheduled_email_by_id(&scheduled.id).unwrap().is_none());
    }

    #[test]
    fn test_settings_update_and_reset() {
        let manager = manager();
        let updated = manager
            .update_settings(SettingsUpdate {
                reminder_hours: Some(4),
                business_hours: Some(BusinessHours {
                    start: "07:00".into(),
                    end: "23:00".into(),
                }),
                ..SettingsUpdate::default()
            })
            .unwrap();
        assert_eq!(updated.reminder_hours, 4);
        assert_eq!(updated.hotel_name, "Grand Hotel");
        assert_eq!(manager.get_settings().unwrap(), updated);

        assert_eq!(manager.reset_settings().unwrap(), Settings::default());
        assert_eq!(manager.get_settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_corrupt_settings_read_as_defaults() {
        let manager = seeded(SETTINGS_KEY, "[1,2,3]");
        assert_eq!(manager.get_settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let manager = seeded(SETTINGS_KEY, r#"{"hotelName":"Harbour Inn"}"#);
        let settings = manager.get_settings().unwrap();
        assert_eq!(settings.hotel_name, "Harbour Inn");
        assert_eq!(settings.reminder_hours, 2);
    }

    #[test]
    fn test_clear_all_data_keeps_settings() {
        let manager = manager();
        manager.add_guest(jane()).unwrap();
        manager.add_email(NewEmail::new(["a@x.com"], "Hi", "Body")).unwrap();
        manager
            .add_scheduled_email(NewScheduledEmail::default())
            .unwrap();
        manager
            .update_settings(SettingsUpdate {
                hotel_name: Some("Harbour Inn".into()),
                ..SettingsUpdate::default()
            })
            .unwrap();

        manager.clear_all_data().unwrap();

        assert!(manager.get_guests().unwrap().is_empty());
        assert!(manager.get_emails().unwrap().is_empty());
        assert!(manager.get_scheduled_emails().unwrap().is_empty());
        assert_eq!(manager.get_settings().unwrap().hotel_name, "Harbour Inn");
        let store = manager.config().store().unwrap();
        assert_eq!(store.get_item(GUESTS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let manager = manager();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let manager = manager.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        manager
                            .add_guest(NewGuest {
                                name: Some(format!("Guest {}-{}", t, i)),
                                ..NewGuest::default()
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(manager.get_guests().unwrap().len(), 200);
    }

    #[test]
    fn test_close() {
        let manager = manager();
        manager.commit().unwrap();
        manager.close().unwrap();
        assert!(manager.is_closed().unwrap());
        // second close is a no-op
        manager.close().unwrap();

        let err = manager.get_guests().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::StoreAlreadyClosed);
    }

    #[test]
    fn test_store_version() {
        assert!(manager().store_version().unwrap().starts_with("InMemory/"));
    }
}
