//! Integration tests for constructing and inspecting `ReasonedError` values.
//!
//! None of these tests fixes the process-wide notifier, so no handler is ever
//! delivered to here; notification is covered by `tests/notification.rs`.

use std::{error::Error, sync::Arc};

use reasoned_error::{NoError, OK, Reason, ReasonedError, reason};

reason! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct InvalidValue {
        pub value: String,
    }
}

reason! {
    #[derive(Debug)]
    pub struct FailToGetValue {
        pub name: String,
    }
}

reason! {
    #[derive(Debug)]
    pub struct FailToDoSomething;
}

reason! {
    pub struct Credentials {
        pub user: String,
        pub attempts: u32,
        password: String,
    }
}

#[derive(Debug, thiserror::Error)]
#[error("def")]
struct DefError;

#[derive(Debug, thiserror::Error)]
enum StorageError {
    #[error("disk full")]
    DiskFull,
}

fn invalid_value() -> InvalidValue {
    InvalidValue {
        value: "abc".to_string(),
    }
}

fn same_error(a: &(dyn Error + 'static), b: &(dyn Error + 'static)) -> bool {
    core::ptr::addr_eq(a, b)
}

#[test]
fn test_reason_by_value() {
    let line = line!() + 1;
    let err = ReasonedError::new(invalid_value());

    assert_eq!(err.to_string(), "reason=InvalidValue, value=abc");
    assert_eq!(err.file_name(), "reasoned_error.rs");
    assert_eq!(err.line_number(), line);

    assert_eq!(err.reason().downcast_ref::<InvalidValue>(), Some(&invalid_value()));
    assert!(err.reason().downcast_ref::<Box<InvalidValue>>().is_none());

    assert!(!err.is_ok());
    assert_eq!(err.reason_name(), "InvalidValue");
    assert_eq!(err.reason_namespace(), "reasoned_error");
    assert_eq!(
        err.situation_value("value")
            .and_then(|v| v.downcast_ref::<String>())
            .map(String::as_str),
        Some("abc")
    );
    assert!(err.situation_value("Value").is_none());

    let situation = err.situation();
    assert_eq!(situation.len(), 1);
    assert_eq!(situation["value"].to_string(), "abc");
    assert!(situation.get("Value").is_none());

    assert!(err.cause().is_none());
    assert!(err.unwrap_cause().is_none());
    assert!(err.source().is_none());
}

#[test]
fn test_reason_by_box() {
    let err = ReasonedError::new(Box::new(invalid_value()));

    assert_eq!(err.to_string(), "reason=InvalidValue, value=abc");
    assert!(err.reason().downcast_ref::<InvalidValue>().is_none());
    assert_eq!(
        err.reason().downcast_ref::<Box<InvalidValue>>().map(|r| &r.value),
        Some(&"abc".to_string())
    );

    assert!(!err.is_ok());
    assert_eq!(err.reason_name(), "InvalidValue");
    assert_eq!(err.reason_namespace(), "reasoned_error");
    assert_eq!(err.situation().len(), 1);
    assert_eq!(err.situation_value("value").unwrap().to_string(), "abc");
}

#[test]
fn test_reason_by_arc() {
    let shared = Arc::new(invalid_value());
    let err = ReasonedError::new(Arc::clone(&shared));

    assert_eq!(err.reason_name(), "InvalidValue");
    assert_eq!(err.to_string(), "reason=InvalidValue, value=abc");
    let stored = err.reason().downcast_ref::<Arc<InvalidValue>>().unwrap();
    assert!(Arc::ptr_eq(stored, &shared));
}

#[test]
fn test_unit_reason() {
    let err = ReasonedError::new(FailToDoSomething);

    assert_eq!(err.to_string(), "reason=FailToDoSomething");
    assert!(err.situation().is_empty());
    assert!(err.situation_value("anything").is_none());
    assert!(err.reason().is::<FailToDoSomething>());
}

#[test]
fn test_private_fields_hidden() {
    let err = ReasonedError::new(Credentials {
        user: "alice".to_string(),
        attempts: 3,
        password: "hunter2".to_string(),
    });

    assert_eq!(err.to_string(), "reason=Credentials, user=alice, attempts=3");
    let situation = err.situation();
    assert_eq!(situation.keys().copied().collect::<Vec<_>>(), ["user", "attempts"]);
    assert!(err.situation_value("password").is_none());
    assert_eq!(
        err.situation_value("attempts").and_then(|v| v.downcast_ref::<u32>()),
        Some(&3)
    );

    let reason = err.reason().downcast_ref::<Credentials>().unwrap();
    assert_eq!(reason.password, "hunter2");
}

#[test]
fn test_situation_value_matches_situation() {
    let err = ReasonedError::new(Credentials {
        user: "bob".to_string(),
        attempts: 1,
        password: String::new(),
    });

    let situation = err.situation();
    for name in ["user", "attempts", "password", "missing"] {
        let from_map = situation.get(name).map(|v| v.to_string());
        let direct = err.situation_value(name).map(|v| v.to_string());
        assert_eq!(from_map, direct, "field {name}");
    }
}

#[test]
fn test_with_foreign_cause() {
    let err = ReasonedError::with_cause(invalid_value(), DefError);

    assert_eq!(err.to_string(), "reason=InvalidValue, value=abc, cause=def");
    assert!(err.cause().unwrap().is::<DefError>());

    let cause = err.cause().unwrap();
    let unwrapped = err.unwrap_cause().unwrap();
    let source = err.source().unwrap();
    assert!(same_error(cause, unwrapped));
    assert!(same_error(cause, source));
}

#[test]
fn test_with_string_cause() {
    let err = ReasonedError::with_cause(FailToDoSomething, "connection reset");
    assert_eq!(
        err.to_string(),
        "reason=FailToDoSomething, cause=connection reset"
    );
}

#[test]
fn test_cause_is_also_reasoned_error() {
    let cause = ReasonedError::new(FailToGetValue {
        name: "foo".to_string(),
    });
    let err = ReasonedError::with_cause(invalid_value(), cause.clone());

    assert_eq!(
        err.to_string(),
        "reason=InvalidValue, value=abc, cause=reason=FailToGetValue, name=foo"
    );
    assert!(!err.is_ok());
    assert_eq!(err.reason_name(), "InvalidValue");
    assert_eq!(err.situation().len(), 1);
    assert!(err.situation_value("name").is_none());

    let inner = err
        .cause()
        .and_then(|c| c.downcast_ref::<ReasonedError>())
        .unwrap();
    assert_eq!(inner.reason_name(), "FailToGetValue");
    assert_eq!(inner.to_string(), cause.to_string());
    assert!(core::ptr::addr_eq(inner.reason(), cause.reason()));
}

#[test]
fn test_source_chain_is_walkable() {
    let root = ReasonedError::with_cause(
        FailToGetValue {
            name: "block-7".to_string(),
        },
        StorageError::DiskFull,
    );
    let err = ReasonedError::with_cause(invalid_value(), root);

    let mut chain = Vec::new();
    let mut current: Option<&(dyn Error + 'static)> = Some(&err);
    while let Some(e) = current {
        chain.push(e);
        current = e.source();
    }

    assert_eq!(chain.len(), 3);
    assert!(chain[2].is::<StorageError>());
    let has_disk_full = chain
        .iter()
        .any(|e| matches!(e.downcast_ref::<StorageError>(), Some(StorageError::DiskFull)));
    assert!(has_disk_full);

    let reasons: Vec<_> = chain
        .iter()
        .filter_map(|e| e.downcast_ref::<ReasonedError>())
        .map(ReasonedError::reason_name)
        .collect();
    assert_eq!(reasons, ["InvalidValue", "FailToGetValue"]);
}

#[test]
fn test_ok() {
    let err = &*OK;

    assert_eq!(err.to_string(), "reason=NoError");
    assert_eq!(err.file_name(), "");
    assert_eq!(err.line_number(), 0);
    assert!(err.reason().is::<NoError>());

    assert!(err.is_ok());
    assert_eq!(err.reason_name(), "NoError");
    assert_eq!(err.reason_namespace(), NoError.namespace());
    assert!(err.situation().is_empty());
    assert!(err.situation_value("value").is_none());
    assert!(err.cause().is_none());
    assert!(err.unwrap_cause().is_none());

    assert!(ReasonedError::ok().is_ok());
}

#[test]
fn test_no_error_created_explicitly_is_ok() {
    assert!(ReasonedError::new(NoError).is_ok());
    assert!(ReasonedError::new(Box::new(NoError)).is_ok());
    assert!(ReasonedError::new(Arc::new(NoError)).is_ok());
    assert!(!ReasonedError::new(FailToDoSomething).is_ok());
}

#[test]
fn test_question_mark_into_box_dyn_error() {
    fn fails() -> Result<(), Box<dyn Error + Send + Sync>> {
        Err(ReasonedError::new(FailToDoSomething))?;
        Ok(())
    }

    let err = fails().unwrap_err();
    let reasoned = err.downcast_ref::<ReasonedError>().unwrap();
    assert_eq!(reasoned.reason_name(), "FailToDoSomething");
}
