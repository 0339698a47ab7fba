use carpark::errors::{CarparkError, CarparkResult, ErrorKind};
use carpark::manager::StorageManager;
use carpark::model::{NewEmail, NewGuest, NewScheduledEmail};
use fake::faker::address::en::StateAbbr;
use fake::faker::internet::en::FreeEmail;
use fake::faker::lorem::en::{Sentence, Words};
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use std::backtrace::Backtrace;
use std::time::{Duration, Instant};
use std::{env, fs, thread};

/// Runs `before`, `test` and `after` with retries, reporting the last failure.
/// `after` also runs when the test body returns an error.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> CarparkResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> CarparkResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> CarparkResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    const MAX_RETRIES: u32 = 3;
    let mut last_error: Option<String> = None;
    let mut last_backtrace: Option<String> = None;

    for attempt in 1..=MAX_RETRIES {
        let start_time = Instant::now();

        let result = std::panic::catch_unwind(|| {
            let backtrace = Backtrace::capture();
            match before() {
                Ok(ctx) => match test(ctx.clone()) {
                    Ok(_) => after(ctx.clone())
                        .map_err(|e| (format!("After run failed: {:?}", e), backtrace.to_string())),
                    Err(e) => {
                        let _ = after(ctx.clone());
                        Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                    }
                },
                Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
            }
        });

        let elapsed = start_time.elapsed();

        match result {
            Ok(Ok(_)) => return,
            Ok(Err((e, bt))) => {
                last_error = Some(e.clone());
                last_backtrace = Some(bt);
                if attempt < MAX_RETRIES {
                    eprintln!(
                        "\n========== Test Attempt {}/{} Failed (took {:?}) ==========",
                        attempt, MAX_RETRIES, elapsed
                    );
                    eprintln!("Error: {}", e);
                    thread::sleep(Duration::from_millis(100 * attempt as u64));
                }
            }
            Err(panic_err) => {
                let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_err.downcast_ref::<String>() {
                    s.clone()
                } else {
                    format!("Unknown panic: {:?}", panic_err.type_id())
                };
                let message = format!("Panic: {}", err_msg);
                last_backtrace = Some(Backtrace::capture().to_string());

                if attempt < MAX_RETRIES {
                    eprintln!(
                        "\n========== Test Attempt {}/{} Panicked (took {:?}) ==========",
                        attempt, MAX_RETRIES, elapsed
                    );
                    eprintln!("{}", message);
                    thread::sleep(Duration::from_millis(100 * attempt as u64));
                }
                last_error = Some(message);
            }
        }
    }

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {} attempts", MAX_RETRIES);
    eprintln!("Last error: {}", last_error.as_deref().unwrap_or("Unknown"));
    if let Some(bt) = &last_backtrace {
        if !bt.is_empty() && !bt.contains("disabled") {
            eprintln!("\nBacktrace:\n{}", bt);
        }
    }
    eprintln!("=====================================================\n");

    panic!(
        "Test failed after {} attempts. Last error: {}",
        MAX_RETRIES,
        last_error.unwrap_or_default()
    );
}

#[derive(Clone)]
pub struct TestContext {
    path: String,
    manager: StorageManager,
}

impl TestContext {
    pub fn new(path: String, manager: StorageManager) -> Self {
        Self { path, manager }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn manager(&self) -> StorageManager {
        self.manager.clone()
    }
}

pub fn random_path() -> String {
    let id = uuid::Uuid::new_v4();
    env::temp_dir()
        .join(format!("carpark-{}", id))
        .to_string_lossy()
        .to_string()
}

/// Opens a manager on the fjall backend at `path`.
#[cfg(feature = "fjall")]
pub fn open_manager(path: &str) -> CarparkResult<StorageManager> {
    use carpark_fjall_adapter::FjallModule;

    // a single flush and compaction worker per keyspace keeps parallel runs light
    let module = FjallModule::with_config()
        .low_memory_preset()
        .db_path(path)
        .build();
    StorageManager::builder().load_module(module).open()
}

#[cfg(feature = "fjall")]
pub fn create_test_context() -> CarparkResult<TestContext> {
    const MAX_ATTEMPTS: u32 = 3;
    let mut last_error: Option<CarparkError> = None;

    for attempt in 1..=MAX_ATTEMPTS {
        let path = random_path();
        match open_manager(&path) {
            Ok(manager) => return Ok(TestContext::new(path, manager)),
            Err(e) => {
                let _ = fs::remove_dir_all(&path);
                if attempt < MAX_ATTEMPTS {
                    eprintln!(
                        "Warning: Failed to create test context (attempt {}/{}): {:?}",
                        attempt, MAX_ATTEMPTS, e
                    );
                    thread::sleep(Duration::from_millis(50 * attempt as u64));
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        CarparkError::new("Failed to create test context", ErrorKind::BackendError)
    }))
}

#[cfg(all(feature = "memory", not(feature = "fjall")))]
pub fn create_test_context() -> CarparkResult<TestContext> {
    let manager = StorageManager::builder().open()?;
    Ok(TestContext::new(random_path(), manager))
}

/// A second, independent in-memory manager, e.g. as a restore target.
pub fn create_memory_context() -> CarparkResult<TestContext> {
    let manager = StorageManager::builder().open()?;
    Ok(TestContext::new(String::new(), manager))
}

pub fn cleanup(ctx: TestContext) -> CarparkResult<()> {
    if let Err(e) = ctx.manager().close() {
        eprintln!("Warning: Failed to close storage manager: {:?}", e);
    }

    let path = ctx.path().to_string();
    if path.is_empty() {
        return Ok(());
    }

    const MAX_RETRIES: u32 = 10;
    let mut delay_ms = 50u64;
    for retry in 0..MAX_RETRIES {
        if !std::path::Path::new(&path).exists() {
            return Ok(());
        }
        match fs::remove_dir_all(&path) {
            Ok(_) => return Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) if retry < MAX_RETRIES - 1 => {
                log::debug!("Retrying removal of {}: {}", path, e);
                thread::sleep(Duration::from_millis(delay_ms));
                delay_ms = std::cmp::min(delay_ms * 2, 1000);
            }
            Err(e) => {
                eprintln!(
                    "Warning: Failed to remove test directory {} after {} attempts: {:?}",
                    path, MAX_RETRIES, e
                );
            }
        }
    }
    Ok(())
}

pub fn fake_guest() -> NewGuest {
    let plate: String = StateAbbr().fake();
    let digits: u16 = (100u16..999).fake();
    let room: u16 = (100u16..599).fake();
    NewGuest {
        name: Some(Name().fake()),
        email: Some(FreeEmail().fake()),
        phone: Some(PhoneNumber().fake()),
        room_number: Some(room.to_string()),
        vehicle_reg: Some(format!("{}{}", plate, digits)),
        email_reminders: true,
        ..NewGuest::default()
    }
}

pub fn fake_guests(count: usize) -> Vec<NewGuest> {
    (0..count).map(|_| fake_guest()).collect()
}

pub fn fake_email(recipients: &[&str]) -> NewEmail {
    let subject: String = Sentence(3..6).fake();
    let words: Vec<String> = Words(8..16).fake();
    NewEmail::new(recipients.iter().copied(), &subject, &words.join(" "))
}

pub fn fake_scheduled_email(recipients: &[&str], scheduled_for: &str) -> NewScheduledEmail {
    NewScheduledEmail {
        recipients: recipients.iter().map(|r| r.to_string()).collect(),
        subject: Some(Sentence(3..6).fake()),
        body: Some(Sentence(8..12).fake()),
        scheduled_for: Some(scheduled_for.to_string()),
        ..NewScheduledEmail::default()
    }
}
