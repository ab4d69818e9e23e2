#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]

//! Logs every constructed [`ReasonedError`] as a `tracing` event.
//!
//! # How It Works
//!
//! [`TracingHandler`] is an [`ErrorHandler`] that emits one event per error,
//! with the reason, its namespace, the creation site and the cause recorded
//! as structured fields. Register it like any other handler during start-up,
//! before the notifier's configuration is fixed.
//!
//! # Quick Start
//!
//! ```
//! use reasoned_error::{ReasonedError, reason};
//!
//! // 1. Set up tracing output as usual.
//! tracing_subscriber::fmt().init();
//!
//! // 2. Log all errors, then close the configuration.
//! reasoned_error_tracing::install();
//! reasoned_error::fix_configuration();
//!
//! // 3. Errors are logged as they are created.
//! reason! {
//!     pub struct FailToConnect {
//!         pub host: String,
//!     }
//! }
//! let _err = ReasonedError::new(FailToConnect {
//!     host: "db.internal".into(),
//! });
//! ```
//!
//! Output:
//! ```text
//! ERROR reasoned_error: reason=FailToConnect, host=db.internal reason="FailToConnect" namespace="rust_out" file="main.rs" line=17
//! ```
//!
//! # Environment Variables
//!
//! - `REASONED_ERROR_TRACING` - Comma-separated options:
//!   - `trace`, `debug`, `info`, `warn` or `error` - The level of the emitted
//!     events. Defaults to `error`.
//!   - `situation` - Also record the reason's public fields as a `situation`
//!     field.

use std::{fmt::Write as _, sync::OnceLock};

use reasoned_error::{ErrorHandler, Occasion, ReasonedError};
use tracing::Level;

/// The target of every event emitted by [`TracingHandler`].
pub const TARGET: &str = "reasoned_error";

/// An [`ErrorHandler`] emitting a `tracing` event for each error.
///
/// The event message is the error's string form. The following fields are
/// recorded:
///
/// - `reason`: the reason name
/// - `namespace`: the module defining the reason
/// - `file`, `line`: where the error was created
/// - `cause`: the cause's string form, if there is a cause
/// - `situation`: the public reason fields, if enabled
///
/// # Examples
///
/// ```
/// use reasoned_error::Notifier;
/// use reasoned_error_tracing::TracingHandler;
/// use tracing::Level;
///
/// let notifier = Notifier::new();
/// notifier.add_sync_handler(TracingHandler::new().with_level(Level::WARN));
/// notifier.fix_configuration();
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TracingHandler {
    level: Level,
    include_situation: bool,
}

#[derive(Debug)]
struct ReasonedErrorTracingEnvOptions {
    level: Level,
    include_situation: bool,
}

impl ReasonedErrorTracingEnvOptions {
    fn get() -> &'static Self {
        static REASONED_ERROR_TRACING_FLAGS: OnceLock<ReasonedErrorTracingEnvOptions> =
            OnceLock::new();

        REASONED_ERROR_TRACING_FLAGS.get_or_init(|| {
            let var = std::env::var_os("REASONED_ERROR_TRACING");
            Self::parse(var.as_deref().map(|v| v.to_string_lossy()).as_deref())
        })
    }

    fn parse(var: Option<&str>) -> Self {
        let mut options = ReasonedErrorTracingEnvOptions {
            level: Level::ERROR,
            include_situation: false,
        };

        for v in var.unwrap_or_default().split(',').map(str::trim) {
            if v.eq_ignore_ascii_case("situation") {
                options.include_situation = true;
            } else if let Some(level) = parse_level(v) {
                options.level = level;
            }
        }

        options
    }
}

fn parse_level(name: &str) -> Option<Level> {
    [
        Level::TRACE,
        Level::DEBUG,
        Level::INFO,
        Level::WARN,
        Level::ERROR,
    ]
    .into_iter()
    .find(|level| level.as_str().eq_ignore_ascii_case(name))
}

impl TracingHandler {
    /// Creates a new [`TracingHandler`].
    ///
    /// Configuration is controlled by environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `REASONED_ERROR_TRACING` - Comma-separated options:
    ///   - `trace`, `debug`, `info`, `warn` or `error` - The event level.
    ///   - `situation` - Record the reason's public fields.
    pub fn new() -> Self {
        let env_options = ReasonedErrorTracingEnvOptions::get();
        Self {
            level: env_options.level,
            include_situation: env_options.include_situation,
        }
    }

    /// Sets the level of the emitted events.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets whether the reason's public fields are recorded as a `situation`
    /// field.
    pub fn with_situation(mut self, include_situation: bool) -> Self {
        self.include_situation = include_situation;
        self
    }

    /// The level of the emitted events.
    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for TracingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorHandler for TracingHandler {
    fn handle(&self, error: &ReasonedError, _occasion: &Occasion) {
        let cause = error.cause().map(|cause| cause.to_string());
        let situation = self.include_situation.then(|| render_situation(error));

        macro_rules! emit {
            ($level:expr) => {
                tracing::event!(
                    target: TARGET,
                    $level,
                    reason = error.reason_name(),
                    namespace = error.reason_namespace(),
                    file = error.file_name(),
                    line = error.line_number(),
                    cause = cause.as_deref(),
                    situation = situation.as_deref(),
                    "{error}"
                )
            };
        }

        match self.level {
            Level::ERROR => emit!(Level::ERROR),
            Level::WARN => emit!(Level::WARN),
            Level::INFO => emit!(Level::INFO),
            Level::DEBUG => emit!(Level::DEBUG),
            _ => emit!(Level::TRACE),
        }
    }
}

fn render_situation(error: &ReasonedError) -> String {
    let mut rendered = String::new();
    for (name, value) in error.situation() {
        if !rendered.is_empty() {
            rendered.push(' ');
        }
        let _ = write!(rendered, "{name}={value}");
    }
    rendered
}

/// Registers a synchronous [`TracingHandler`] on the process-wide default
/// notifier.
///
/// Has no effect once [`reasoned_error::fix_configuration`] has been called.
#[track_caller]
pub fn install() {
    reasoned_error::add_sync_handler(TracingHandler::new());
}

/// Registers an asynchronous [`TracingHandler`] on the process-wide default
/// notifier.
///
/// The events are then emitted from the asynchronous handler threads, outside
/// of any span active where the error was created.
#[track_caller]
pub fn install_async() {
    reasoned_error::add_async_handler(TracingHandler::new());
}
