// Free functions and macros over the process-wide router. Every test resets
// the global state, so they run serially.
use parking_lot::Mutex;
use rask_log_router::router::DEBUG_DOMAINS_ENV;
use rask_log_router::{
    FieldSet, LevelMask, LogLevel, LogRecord, LogRouter, MESSAGE_KEY, PrintFunc, WriterOutput,
};
use serial_test::serial;
use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

type Captured = Arc<Mutex<Vec<(String, LogLevel, String)>>>;

/// Replaces the global default handler with one that records every call.
fn capture_default() -> Captured {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&captured);
    rask_log_router::set_default_handler(Some(Arc::new(move |record: &LogRecord<'_>| {
        sink.lock().push((
            record.domain().to_string(),
            record.level(),
            record.message().into_owned(),
        ));
    })));
    captured
}

#[test]
#[serial]
fn test_print_handler_replaces_console() {
    rask_log_router::reset();
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(String::new()));

    let (counter, text) = (Arc::clone(&count), Arc::clone(&seen));
    let sink: PrintFunc = Arc::new(move |s: &str| {
        counter.fetch_add(1, Ordering::SeqCst);
        text.lock().push_str(s);
    });
    let previous = rask_log_router::set_print_handler(Some(sink));
    assert!(previous.is_none());

    rask_log_router::log_print!("{}", "hello world");

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(*seen.lock(), "hello world");
    assert!(rask_log_router::set_print_handler(None).is_some());
    rask_log_router::reset();
}

#[test]
#[serial]
fn test_printerr_handler_is_independent() {
    rask_log_router::reset();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let previous = rask_log_router::set_printerr_handler(Some(Arc::new(move |_: &str| {
        counter.fetch_add(1, Ordering::SeqCst);
    })));
    assert!(previous.is_none());

    rask_log_router::log_printerr!("to stderr sink");

    assert_eq!(count.load(Ordering::SeqCst), 1);
    // The print slot is untouched.
    assert!(rask_log_router::set_print_handler(None).is_none());
    rask_log_router::reset();
}

#[test]
#[serial]
fn test_leveled_macros() {
    rask_log_router::reset();
    let captured = capture_default();

    rask_log_router::critical!("critical {}", 1);
    rask_log_router::warning!(domain: "macros"; "warning {}", 2);
    rask_log_router::message!("message {}", 3);
    rask_log_router::info!("info {}", 4);
    rask_log_router::log!("macros", LogLevel::Custom(1 << 10), "custom {}", 5);

    assert_eq!(
        *captured.lock(),
        vec![
            ("".to_string(), LogLevel::Critical, "critical 1".to_string()),
            ("macros".to_string(), LogLevel::Warning, "warning 2".to_string()),
            ("".to_string(), LogLevel::Message, "message 3".to_string()),
            ("".to_string(), LogLevel::Info, "info 4".to_string()),
            ("macros".to_string(), LogLevel::Custom(1 << 10), "custom 5".to_string()),
        ]
    );
    rask_log_router::reset();
}

#[test]
#[serial]
fn test_domain_handler_via_free_functions() {
    rask_log_router::reset();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let id = rask_log_router::add_handler("bu", LevelMask::ALL, move |_: &LogRecord<'_>| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();

    rask_log_router::warning!(domain: "bu"; "one");
    rask_log_router::remove_handler("bu", id).unwrap();
    let captured = capture_default();
    rask_log_router::warning!(domain: "bu"; "two");

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(captured.lock().len(), 1);
    rask_log_router::reset();
}

#[test]
#[serial]
fn test_log_structured_macro() {
    rask_log_router::reset();
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    rask_log_router::set_writer(
        Some(Arc::new(move |level: LogLevel, fields: &FieldSet<'_>| {
            let message = fields.get(MESSAGE_KEY).map(|v| v.to_string_lossy().into_owned());
            let id = fields.get("MESSAGE_ID").map(|v| v.to_string_lossy().into_owned());
            sink.lock().push((level, fields.domain().to_string(), id, message));
            WriterOutput::Handled
        })),
        None,
    );

    rask_log_router::log_structured!("some-domain", LogLevel::Message,
        "MESSAGE_ID" => "06d4df59e6c24647bfe69d2c27ef0b4e";
        "This is a debug message about integer {}.", 123);
    rask_log_router::log_structured!("some-domain", LogLevel::Warning; "bare");

    assert_eq!(
        *messages.lock(),
        vec![
            (
                LogLevel::Message,
                "some-domain".to_string(),
                Some("06d4df59e6c24647bfe69d2c27ef0b4e".to_string()),
                Some("This is a debug message about integer 123.".to_string()),
            ),
            (
                LogLevel::Warning,
                "some-domain".to_string(),
                None,
                Some("bare".to_string()),
            ),
        ]
    );
    rask_log_router::reset();
}

fn halve_even(value: i32) -> Option<i32> {
    rask_log_router::return_val_if_fail!(value % 2 == 0, None);
    Some(value / 2)
}

fn record_if(flag: bool, hits: &AtomicUsize) {
    rask_log_router::return_if_fail!(flag);
    hits.fetch_add(1, Ordering::SeqCst);
}

#[test]
#[serial]
fn test_return_if_fail_macros() {
    rask_log_router::reset();
    let captured = capture_default();
    let hits = AtomicUsize::new(0);

    assert_eq!(halve_even(4), Some(2));
    assert_eq!(halve_even(3), None);
    record_if(true, &hits);
    record_if(false, &hits);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    let captured = captured.lock();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].1, LogLevel::Critical);
    assert!(captured[0].2.ends_with(": assertion 'value % 2 == 0' failed"));
    assert!(captured[1].2.ends_with(": assertion 'flag' failed"));
    drop(captured);
    rask_log_router::reset();
}

#[test]
#[serial]
fn test_warn_macros() {
    rask_log_router::reset();
    let captured = capture_default();

    rask_log_router::warn_if_fail!(1 + 1 == 3);
    rask_log_router::warn_if_fail!(1 + 1 == 2);
    rask_log_router::warn_if_reached!();

    let captured = captured.lock();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].1, LogLevel::Warning);
    assert!(captured[0].2.contains("global_api_test.rs"));
    assert!(captured[0].2.ends_with("runtime check failed: (1 + 1 == 3)"));
    assert!(captured[1].2.ends_with("code should not be reached"));
    drop(captured);
    rask_log_router::reset();
}

#[test]
#[serial]
fn test_environment_allowlist_is_read_per_call() {
    rask_log_router::reset();
    let router = LogRouter::global();

    unsafe {
        env::set_var(DEBUG_DOMAINS_ENV, "foo bar baz");
    }
    assert!(router.admits("bar", LogLevel::Info));
    assert!(!router.admits("qux", LogLevel::Info));

    unsafe {
        env::set_var(DEBUG_DOMAINS_ENV, "all");
    }
    assert!(router.admits("qux", LogLevel::Debug));

    unsafe {
        env::remove_var(DEBUG_DOMAINS_ENV);
    }
    assert!(!router.admits("bar", LogLevel::Info));
    assert!(router.admits("", LogLevel::Debug));
    assert!(router.admits("bar", LogLevel::Warning));
}

#[test]
#[serial]
fn test_reset_clears_fatal_masks() {
    rask_log_router::reset();
    let previous = rask_log_router::set_fatal_mask("bu", LogLevel::Warning);
    assert_eq!(previous, LevelMask::from(LogLevel::Error));
    assert!(LogRouter::global().is_fatal("bu", LogLevel::Warning));

    rask_log_router::reset();
    assert!(!LogRouter::global().is_fatal("bu", LogLevel::Warning));
    assert!(LogRouter::global().is_fatal("bu", LogLevel::Error));
}
