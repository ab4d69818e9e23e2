use core::{any::TypeId, error::Error, fmt, panic::Location};
use std::sync::LazyLock;

use triomphe::Arc;

use crate::{
    notify::Notifier,
    reason::{FieldValue, NoError, Reason, Situation},
    util::file_basename,
};

/// The error type accepted as the cause of a [`ReasonedError`].
///
/// Anything implementing [`Error`] + [`Send`] + [`Sync`] converts into it,
/// including [`ReasonedError`] itself, as do `&str` and `String`.
pub type Cause = Box<dyn Error + Send + Sync + 'static>;

/// An error carrying a typed reason, an optional cause and the location at
/// which it was created.
///
/// The reason is any value implementing [`Reason`]. Its type identifies the
/// kind of failure, and its public fields, the *situation*, describe the
/// circumstances. The reason can be recovered with
/// [`reason().downcast_ref()`](Self::reason) for matching.
///
/// A `ReasonedError` is immutable once created. Cloning it is cheap: clones
/// share the same reason, cause and location.
///
/// # Examples
///
/// ```
/// use reasoned_error::{ReasonedError, reason};
///
/// reason! {
///     #[derive(Debug)]
///     pub struct InvalidValue {
///         pub value: String,
///     }
/// }
///
/// fn parse(value: &str) -> Result<u32, ReasonedError> {
///     value.parse().map_err(|cause| {
///         ReasonedError::with_cause(
///             InvalidValue {
///                 value: value.to_string(),
///             },
///             cause,
///         )
///     })
/// }
///
/// let err = parse("abc").unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "reason=InvalidValue, value=abc, cause=invalid digit found in string"
/// );
///
/// match err.reason().downcast_ref::<InvalidValue>() {
///     Some(InvalidValue { value }) => assert_eq!(value, "abc"),
///     None => unreachable!(),
/// }
/// ```
#[derive(Clone)]
pub struct ReasonedError(Arc<ErrorData>);

struct ErrorData {
    reason: Box<dyn Reason>,
    cause: Option<Cause>,
    file: &'static str,
    line: u32,
}

/// The canonical error value indicating that no error occurred.
///
/// Its reason is [`NoError`]. It has an empty situation, no cause, and no
/// source location since it was not created at any particular call site.
/// Creating it does not notify any handler.
///
/// ```
/// use reasoned_error::OK;
///
/// assert!(OK.is_ok());
/// assert_eq!(OK.reason_name(), "NoError");
/// assert_eq!(OK.to_string(), "reason=NoError");
/// assert_eq!(OK.file_name(), "");
/// assert_eq!(OK.line_number(), 0);
/// ```
pub static OK: LazyLock<ReasonedError> =
    LazyLock::new(|| ReasonedError::assemble(NoError, None, None));

impl ReasonedError {
    /// Creates a new error with the given reason and no cause.
    ///
    /// The caller's file and line are recorded, and the error is delivered to
    /// the handlers of the process-wide default [`Notifier`].
    #[track_caller]
    pub fn new<R: Reason>(reason: R) -> Self {
        Self::from_parts(reason, None, Notifier::global())
    }

    /// Creates a new error with the given reason, caused by `cause`.
    ///
    /// The caller's file and line are recorded, and the error is delivered to
    /// the handlers of the process-wide default [`Notifier`].
    #[track_caller]
    pub fn with_cause<R, E>(reason: R, cause: E) -> Self
    where
        R: Reason,
        E: Into<Cause>,
    {
        Self::from_parts(reason, Some(cause.into()), Notifier::global())
    }

    /// Creates a new error from a reason and an optional cause, delivering it
    /// to the handlers of `notifier`.
    ///
    /// The caller's file and line are recorded.
    #[track_caller]
    pub fn from_parts<R: Reason>(reason: R, cause: Option<Cause>, notifier: &Notifier) -> Self {
        let error = Self::assemble(reason, cause, Some(Location::caller()));
        notifier.notify(&error);
        error
    }

    /// Returns a clone of [`OK`].
    pub fn ok() -> Self {
        OK.clone()
    }

    fn assemble<R: Reason>(
        reason: R,
        cause: Option<Cause>,
        location: Option<&'static Location<'static>>,
    ) -> Self {
        Self(Arc::new(ErrorData {
            reason: Box::new(reason),
            cause,
            file: location.map_or("", |location| file_basename(location.file())),
            line: location.map_or(0, Location::line),
        }))
    }

    /// The reason of this error.
    ///
    /// Use `downcast_ref` on the returned [`Reason`] to recover the concrete
    /// reason. A reason passed as `Box<R>` or `Arc<R>` is stored as
    /// that pointer type and must be downcast to it.
    pub fn reason(&self) -> &dyn Reason {
        &*self.0.reason
    }

    /// The name of the reason type, e.g. `"InvalidValue"`.
    ///
    /// A reason stored behind a pointer reports the name of the pointee.
    pub fn reason_name(&self) -> &'static str {
        self.0.reason.name()
    }

    /// The module path in which the reason type is defined.
    ///
    /// A reason stored behind a pointer reports the namespace of the pointee.
    pub fn reason_namespace(&self) -> &'static str {
        self.0.reason.namespace()
    }

    /// The publicly readable fields of the reason, keyed by name.
    ///
    /// The map is built anew on every call.
    pub fn situation(&self) -> Situation<'_> {
        self.0
            .reason
            .fields()
            .into_iter()
            .map(|field| (field.name, field.value))
            .collect()
    }

    /// The value of the reason's public field `name`, if it has one.
    pub fn situation_value(&self, name: &str) -> Option<&dyn FieldValue> {
        self.0
            .reason
            .fields()
            .into_iter()
            .find(|field| field.name == name)
            .map(|field| field.value)
    }

    /// The base name of the source file in which this error was created, or
    /// `""` if unknown.
    pub fn file_name(&self) -> &'static str {
        self.0.file
    }

    /// The line at which this error was created, or `0` if unknown.
    pub fn line_number(&self) -> u32 {
        self.0.line
    }

    /// The error that caused this error, if any.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.0.cause.as_deref()
    }

    /// The wrapped error. Always the same as [`cause`](Self::cause).
    ///
    /// [`Error::source`] returns the same error, so generic chain walkers
    /// see through a `ReasonedError` to its cause.
    pub fn unwrap_cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause()
    }

    /// Whether this error indicates that no error occurred, i.e. whether its
    /// reason is [`NoError`], stored by value or behind a pointer.
    pub fn is_ok(&self) -> bool {
        self.0.reason.reason_type_id() == TypeId::of::<NoError>()
    }
}

impl Default for ReasonedError {
    fn default() -> Self {
        Self::ok()
    }
}

impl fmt::Display for ReasonedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reason={}", self.reason_name())?;
        for field in self.0.reason.fields() {
            write!(f, ", {}={}", field.name, field.value)?;
        }
        if let Some(cause) = &self.0.cause {
            write!(f, ", cause={cause}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ReasonedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReasonedError")
            .field("reason", &self.0.reason)
            .field("namespace", &self.reason_namespace())
            .field("file", &self.0.file)
            .field("line", &self.0.line)
            .field("cause", &self.0.cause)
            .finish()
    }
}

impl Error for ReasonedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0
            .cause
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}
