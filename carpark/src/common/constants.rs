// store keys
pub const GUESTS_KEY: &str = "carpark_guests";
pub const EMAILS_KEY: &str = "carpark_emails";
pub const SCHEDULED_KEY: &str = "carpark_scheduled";
pub const SETTINGS_KEY: &str = "carpark_settings";
pub const COLLECTION_KEYS: [&str; 3] = [GUESTS_KEY, EMAILS_KEY, SCHEDULED_KEY];

// empty collection as persisted
pub const EMPTY_COLLECTION: &str = "[]";

// default settings
pub const DEFAULT_HOTEL_NAME: &str = "Grand Hotel";
pub const DEFAULT_EMAIL_FROM: &str = "parking@grandhotel.com";
pub const DEFAULT_BUSINESS_START: &str = "08:00";
pub const DEFAULT_BUSINESS_END: &str = "22:00";
pub const DEFAULT_AUTO_REMINDERS: bool = true;
pub const DEFAULT_REMINDER_HOURS: u32 = 2;

// reporting defaults
pub const DEFAULT_REVENUE_PER_GUEST: u64 = 25;
pub const DEFAULT_TOP_RECIPIENTS: usize = 5;

// identifier
pub const ID_SUFFIX_LEN: usize = 9;
pub const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// backup
pub const BACKUP_FILE_PREFIX: &str = "carpark-backup-";
pub const BACKUP_FILE_EXTENSION: &str = "json";
