//! Creation notification for [`ReasonedError`] values.
//!
//! Parts of a program can subscribe to every error construction by
//! registering handlers on a [`Notifier`]. Registration is meant to happen
//! during start-up: once [`Notifier::fix_configuration`] has been called no
//! further handlers are accepted, and from then on every constructed error is
//! delivered to the registered handlers.
//!
//! - **Synchronous handlers** run on the constructing thread, in registration
//!   order, before the constructor returns.
//! - **Asynchronous handlers** each run on their own thread. The constructor
//!   does not wait for them, and they may run in any order relative to each
//!   other.
//!
//! Errors constructed before the configuration is fixed are never delivered.
//!
//! The process-wide default notifier is used by [`ReasonedError::new`] and by
//! the free functions [`add_sync_handler`], [`add_async_handler`] and
//! [`fix_configuration`]:
//!
//! ```
//! use reasoned_error::{Occasion, ReasonedError, reason};
//!
//! reasoned_error::add_sync_handler(|err: &ReasonedError, occ: &Occasion| {
//!     eprintln!("{err} (handler registered at {}:{})", occ.file(), occ.line());
//! });
//! reasoned_error::fix_configuration();
//!
//! reason! {
//!     pub struct FailToDoSomething {
//!         pub name: String,
//!     }
//! }
//!
//! // Runs the handler above before returning.
//! let _err = ReasonedError::new(FailToDoSomething { name: "abc".into() });
//! ```
//!
//! Independent notifiers can be created with [`Notifier::new`] and passed to
//! [`ReasonedError::from_parts`].

use core::{fmt, panic::Location};
use std::{sync::OnceLock, thread, time::SystemTime};

use triomphe::Arc;

use crate::{ReasonedError, handler_lock::HandlerLock, util::file_basename};

/// A handler notified whenever a [`ReasonedError`] is constructed.
///
/// Implemented for every closure taking `(&ReasonedError, &Occasion)`.
///
/// Panics inside a handler are not caught: a panicking synchronous handler
/// unwinds through the error constructor, and a panicking asynchronous
/// handler terminates its own thread only.
pub trait ErrorHandler: 'static + Send + Sync {
    /// Called with the newly constructed error.
    fn handle(&self, error: &ReasonedError, occasion: &Occasion);
}

impl<F> ErrorHandler for F
where
    F: Fn(&ReasonedError, &Occasion) + 'static + Send + Sync,
{
    fn handle(&self, error: &ReasonedError, occasion: &Occasion) {
        self(error, occasion)
    }
}

/// Metadata about a single delivery of an error to a handler.
#[derive(Clone, Copy, Debug)]
pub struct Occasion {
    time: SystemTime,
    registered_at: &'static Location<'static>,
}

impl Occasion {
    /// The time at which delivery started.
    ///
    /// All handlers notified about the same error see the same time.
    pub fn time(&self) -> SystemTime {
        self.time
    }

    /// The base name of the source file in which the handler was registered.
    pub fn file(&self) -> &'static str {
        file_basename(self.registered_at.file())
    }

    /// The line at which the handler was registered.
    pub fn line(&self) -> u32 {
        self.registered_at.line()
    }
}

struct StoredHandler {
    handler: Box<dyn ErrorHandler>,
    handler_type: &'static str,
    added_at: &'static Location<'static>,
}

impl StoredHandler {
    fn deliver(&self, error: &ReasonedError, time: SystemTime) {
        let occasion = Occasion {
            time,
            registered_at: self.added_at,
        };
        self.handler.handle(error, &occasion);
    }
}

impl fmt::Debug for StoredHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error handler {} registered at {}:{}",
            self.handler_type,
            self.added_at.file(),
            self.added_at.line()
        )
    }
}

#[derive(Debug)]
struct HandlerLists {
    sync: Vec<StoredHandler>,
    asynchronous: Vec<StoredHandler>,
}

impl HandlerLists {
    const fn new() -> Self {
        Self {
            sync: Vec::new(),
            asynchronous: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Delivery {
    Sync,
    Async,
}

/// A registry of error creation handlers with a one-way activation latch.
///
/// A notifier starts out open: handlers can be added with
/// [`add_sync_handler`](Self::add_sync_handler) and
/// [`add_async_handler`](Self::add_async_handler), but no error is delivered.
/// [`fix_configuration`](Self::fix_configuration) closes registration for
/// good and activates delivery. There is no way to remove a handler or to
/// reopen a fixed notifier.
///
/// # Examples
///
/// ```
/// use std::sync::{
///     Arc,
///     atomic::{AtomicUsize, Ordering},
/// };
///
/// use reasoned_error::{Notifier, Occasion, Reason, ReasonedError};
///
/// struct FailToDoSomething;
/// impl Reason for FailToDoSomething {}
///
/// let notifier = Notifier::new();
/// let seen = Arc::new(AtomicUsize::new(0));
///
/// let counter = Arc::clone(&seen);
/// notifier.add_sync_handler(move |_: &ReasonedError, _: &Occasion| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// // Not delivered: the configuration is still open.
/// ReasonedError::from_parts(FailToDoSomething, None, &notifier);
/// assert_eq!(seen.load(Ordering::SeqCst), 0);
///
/// notifier.fix_configuration();
/// ReasonedError::from_parts(FailToDoSomething, None, &notifier);
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
pub struct Notifier {
    /// Handler lists accepting registrations; emptied when fixed.
    open: HandlerLock<HandlerLists>,
    /// Handler lists frozen by `fix_configuration`; set exactly once, while
    /// holding `open`.
    fixed: OnceLock<Arc<HandlerLists>>,
}

static GLOBAL: Notifier = Notifier::new();

impl Notifier {
    /// Creates a new, open notifier with no handlers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            open: HandlerLock::new(HandlerLists::new()),
            fixed: OnceLock::new(),
        }
    }

    /// The process-wide default notifier.
    ///
    /// This is the notifier used by [`ReasonedError::new`],
    /// [`ReasonedError::with_cause`] and the free registration functions of
    /// this crate.
    pub fn global() -> &'static Notifier {
        &GLOBAL
    }

    /// Adds a handler that runs synchronously whenever an error is
    /// constructed.
    ///
    /// Synchronous handlers run in the order they were added, on the thread
    /// constructing the error. Does nothing once the configuration is fixed.
    #[track_caller]
    pub fn add_sync_handler<H: ErrorHandler>(&self, handler: H) {
        self.register(handler, Delivery::Sync);
    }

    /// Adds a handler that runs asynchronously whenever an error is
    /// constructed.
    ///
    /// Every asynchronous handler runs on a thread of its own. Does nothing
    /// once the configuration is fixed.
    #[track_caller]
    pub fn add_async_handler<H: ErrorHandler>(&self, handler: H) {
        self.register(handler, Delivery::Async);
    }

    /// Fixes the configuration.
    ///
    /// Afterwards handlers can no longer be added and errors constructed with
    /// this notifier are delivered to the handlers. Calling this more than
    /// once has no further effect.
    pub fn fix_configuration(&self) {
        let mut open = self.open.lock();
        let Some(lists) = open.take() else {
            return;
        };

        tracing::debug!(
            sync_handlers = lists.sync.len(),
            async_handlers = lists.asynchronous.len(),
            "error handler configuration fixed"
        );
        // Only ever set here, and `open` was still populated, so the cell is
        // empty.
        let _ = self.fixed.set(Arc::new(lists));
    }

    /// Whether [`fix_configuration`](Self::fix_configuration) has been called.
    pub fn is_fixed(&self) -> bool {
        self.fixed.get().is_some()
    }

    /// The number of registered synchronous handlers.
    pub fn sync_handler_count(&self) -> usize {
        self.with_lists(|lists| lists.sync.len())
    }

    /// The number of registered asynchronous handlers.
    pub fn async_handler_count(&self) -> usize {
        self.with_lists(|lists| lists.asynchronous.len())
    }

    #[track_caller]
    fn register<H: ErrorHandler>(&self, handler: H, delivery: Delivery) {
        let added_at = Location::caller();
        let mut open = self.open.lock();
        let Some(lists) = open.get_mut() else {
            tracing::debug!(
                file = added_at.file(),
                line = added_at.line(),
                ?delivery,
                "error handler configuration is fixed, ignoring handler"
            );
            return;
        };

        let stored = StoredHandler {
            handler: Box::new(handler),
            handler_type: core::any::type_name::<H>(),
            added_at,
        };
        tracing::debug!(handler = ?stored, ?delivery, "error handler registered");
        match delivery {
            Delivery::Sync => lists.sync.push(stored),
            Delivery::Async => lists.asynchronous.push(stored),
        }
    }

    fn with_lists<T>(&self, f: impl FnOnce(&HandlerLists) -> T) -> T {
        // Holding the lock orders this read after any concurrent
        // `fix_configuration`, so exactly one of the two is populated.
        let open = self.open.lock();
        match (open.get(), self.fixed.get()) {
            (Some(lists), _) => f(lists),
            (None, Some(lists)) => f(lists),
            (None, None) => f(&HandlerLists::new()),
        }
    }

    /// Delivers a newly constructed error to the handlers.
    pub(crate) fn notify(&self, error: &ReasonedError) {
        let Some(lists) = self.fixed.get() else {
            return;
        };
        if lists.sync.is_empty() && lists.asynchronous.is_empty() {
            return;
        }

        let time = SystemTime::now();
        for stored in &lists.sync {
            stored.deliver(error, time);
        }

        if !lists.asynchronous.is_empty() {
            let lists = Arc::clone(lists);
            let error = error.clone();
            let spawned = thread::Builder::new()
                .name("reasoned-error-dispatch".into())
                .spawn(move || dispatch_async(&lists, &error, time));
            if let Err(spawn_error) = spawned {
                tracing::warn!(
                    error = %spawn_error,
                    "failed to spawn asynchronous error handler dispatch"
                );
            }
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_lists(|lists| {
            f.debug_struct("Notifier")
                .field("fixed", &self.is_fixed())
                .field("sync", &lists.sync)
                .field("asynchronous", &lists.asynchronous)
                .finish()
        })
    }
}

fn dispatch_async(lists: &Arc<HandlerLists>, error: &ReasonedError, time: SystemTime) {
    for (index, stored) in lists.asynchronous.iter().enumerate() {
        let shared = Arc::clone(lists);
        let error = error.clone();
        let spawned = thread::Builder::new()
            .spawn(move || shared.asynchronous[index].deliver(&error, time));
        if let Err(spawn_error) = spawned {
            tracing::warn!(
                error = %spawn_error,
                handler = ?stored,
                "failed to spawn asynchronous error handler"
            );
        }
    }
}

/// Adds a synchronous handler to the process-wide default notifier.
///
/// See [`Notifier::add_sync_handler`].
#[track_caller]
pub fn add_sync_handler<H: ErrorHandler>(handler: H) {
    Notifier::global().add_sync_handler(handler);
}

/// Adds an asynchronous handler to the process-wide default notifier.
///
/// See [`Notifier::add_async_handler`].
#[track_caller]
pub fn add_async_handler<H: ErrorHandler>(handler: H) {
    Notifier::global().add_async_handler(handler);
}

/// Fixes the configuration of the process-wide default notifier.
///
/// See [`Notifier::fix_configuration`].
pub fn fix_configuration() {
    Notifier::global().fix_configuration();
}
