//! Integration test for creation notification through the process-wide
//! default notifier.
//!
//! The default notifier can only be fixed once per process, so the whole
//! lifecycle is exercised in a single test function.

use std::{
    sync::{Arc, Mutex, mpsc},
    time::Duration,
};

use reasoned_error::{Notifier, OK, Occasion, ReasonedError, reason};

reason! {
    pub struct FailToDoSomething;
}

reason! {
    pub struct DuringStartup {
        pub step: u32,
    }
}

type Log = Arc<Mutex<Vec<(&'static str, &'static str)>>>;

fn logging_handler(log: Log, id: &'static str) -> impl Fn(&ReasonedError, &Occasion) {
    move |err: &ReasonedError, _: &Occasion| {
        log.lock().unwrap().push((id, err.reason_name()));
    }
}

#[test]
fn test_default_notifier_lifecycle() {
    let log: Log = Arc::default();
    let (sender, receiver) = mpsc::channel();

    reasoned_error::add_sync_handler(logging_handler(Arc::clone(&log), "H1"));
    reasoned_error::add_sync_handler(logging_handler(Arc::clone(&log), "H2"));
    let registered_line = line!() + 1;
    reasoned_error::add_async_handler(move |err: &ReasonedError, occ: &Occasion| {
        let _ = sender.send((err.reason_name(), err.to_string(), occ.file(), occ.line()));
    });

    let notifier = Notifier::global();
    assert!(!notifier.is_fixed());
    assert_eq!(notifier.sync_handler_count(), 2);
    assert_eq!(notifier.async_handler_count(), 1);

    // Errors created while the configuration is open are not delivered.
    let _ = ReasonedError::new(DuringStartup { step: 1 });
    assert!(log.lock().unwrap().is_empty());
    assert!(receiver.recv_timeout(Duration::from_millis(100)).is_err());

    reasoned_error::fix_configuration();
    assert!(notifier.is_fixed());

    // Late registrations are ignored.
    reasoned_error::add_sync_handler(logging_handler(Arc::clone(&log), "late"));
    reasoned_error::add_async_handler(logging_handler(Arc::clone(&log), "late"));
    assert_eq!(notifier.sync_handler_count(), 2);
    assert_eq!(notifier.async_handler_count(), 1);

    let _ = ReasonedError::new(FailToDoSomething);
    assert_eq!(
        *log.lock().unwrap(),
        [("H1", "FailToDoSomething"), ("H2", "FailToDoSomething")]
    );

    let (name, rendered, file, line) = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(name, "FailToDoSomething");
    assert_eq!(rendered, "reason=FailToDoSomething");
    assert_eq!(file, "notification.rs");
    assert_eq!(line, registered_line);

    // The canonical no-error value is never delivered.
    assert!(OK.is_ok());
    assert_eq!(log.lock().unwrap().len(), 2);
    assert!(receiver.recv_timeout(Duration::from_millis(100)).is_err());
}
