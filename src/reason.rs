//! Reasons: typed records describing why a [`ReasonedError`] was created.
//!
//! A reason is an ordinary struct. The *name* of its type says what went
//! wrong, and its fields describe the situation in which it went wrong. Two
//! reasons are the same kind of failure exactly when they are the same Rust
//! type, so there are no string error codes to keep in sync.
//!
//! Rust has no runtime reflection over struct fields, so each reason type
//! describes itself through the [`Reason`] trait. The [`reason!`] macro writes
//! that implementation for you:
//!
//! ```
//! use reasoned_error::{ReasonedError, reason};
//!
//! reason! {
//!     #[derive(Debug)]
//!     pub struct InvalidValue {
//!         pub value: String,
//!         attempts: u32,
//!     }
//! }
//!
//! let err = ReasonedError::new(InvalidValue {
//!     value: "abc".to_string(),
//!     attempts: 3,
//! });
//! assert_eq!(err.reason_name(), "InvalidValue");
//! // Only `pub` fields are part of the situation.
//! assert_eq!(err.situation().len(), 1);
//! ```
//!
//! [`ReasonedError`]: crate::ReasonedError
//! [`reason!`]: crate::reason!

use core::{
    any::{Any, TypeId},
    fmt,
};
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// A value that can appear as a field of a [`Reason`].
///
/// Field values are rendered with [`Display`](fmt::Display) in the string
/// form of an error, and can be recovered as their concrete type with
/// `downcast_ref`.
///
/// This trait is implemented for every `'static` type that is `Debug`,
/// `Display`, `Send` and `Sync`.
pub trait FieldValue: Any + fmt::Debug + fmt::Display + Send + Sync {}

impl<T> FieldValue for T where T: Any + fmt::Debug + fmt::Display + Send + Sync {}

impl dyn FieldValue {
    /// Returns `true` if the field value is of type `T`.
    pub fn is<T: Any>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    /// Returns the field value as a `&T` if it is of type `T`.
    ///
    /// ```
    /// use reasoned_error::{ReasonedError, reason};
    ///
    /// reason! {
    ///     pub struct FailToGetValue {
    ///         pub name: String,
    ///     }
    /// }
    ///
    /// let err = ReasonedError::new(FailToGetValue { name: "foo".into() });
    /// let name = err.situation_value("name").and_then(|v| v.downcast_ref::<String>());
    /// assert_eq!(name.map(String::as_str), Some("foo"));
    /// ```
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

/// A single publicly readable field of a [`Reason`].
#[derive(Clone, Copy, Debug)]
pub struct Field<'a> {
    /// The field name as declared in the reason type.
    pub name: &'static str,
    /// The current value of the field.
    pub value: &'a dyn FieldValue,
}

impl<'a> Field<'a> {
    /// Creates a new field entry.
    pub fn new(name: &'static str, value: &'a dyn FieldValue) -> Self {
        Self { name, value }
    }
}

/// The publicly readable fields of a reason, keyed by field name.
///
/// Entries appear in field declaration order.
pub type Situation<'a> = IndexMap<&'static str, &'a dyn FieldValue, FxBuildHasher>;

/// A typed record describing why an operation failed.
///
/// Every method has a default implementation. The defaults derive the name
/// and namespace from [`core::any::type_name`] and report no fields, so a
/// field-less reason only needs an empty `impl`:
///
/// ```
/// use reasoned_error::{Reason, ReasonedError};
///
/// struct FailToDoSomething;
/// impl Reason for FailToDoSomething {}
///
/// let err = ReasonedError::new(FailToDoSomething);
/// assert_eq!(err.reason_name(), "FailToDoSomething");
/// ```
///
/// Reasons with fields are best declared with the [`reason!`](crate::reason!)
/// macro, which also pins the name and namespace to the declaration instead
/// of relying on the compiler's type name formatting.
///
/// A reason may be stored by value or behind a [`Box`] or [`Arc`]; the
/// pointer implementations forward every method to the pointee.
pub trait Reason: Any + Send + Sync {
    /// The name of the reason type, without its namespace.
    fn name(&self) -> &'static str {
        split_type_name(core::any::type_name::<Self>()).1
    }

    /// The module path in which the reason type is defined.
    fn namespace(&self) -> &'static str {
        split_type_name(core::any::type_name::<Self>()).0
    }

    /// The publicly readable fields of the reason, in declaration order.
    ///
    /// Private fields must not be listed.
    fn fields(&self) -> Vec<Field<'_>> {
        Vec::new()
    }

    /// The [`TypeId`] of the reason after dereferencing any pointer it is
    /// stored behind.
    fn reason_type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}

impl dyn Reason {
    /// Returns `true` if the stored reason is of type `R`.
    ///
    /// This compares the stored type exactly: a reason stored as `Box<R>` is
    /// a `Box<R>`, not an `R`.
    pub fn is<R: Reason>(&self) -> bool {
        (self as &dyn Any).is::<R>()
    }

    /// Returns the stored reason as a `&R` if it is of type `R`.
    ///
    /// As with `is`, a reason stored behind a pointer must be downcast to the
    /// pointer type.
    pub fn downcast_ref<R: Reason>(&self) -> Option<&R> {
        (self as &dyn Any).downcast_ref::<R>()
    }
}

impl fmt::Debug for dyn Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.name());
        for field in self.fields() {
            s.field(field.name, field.value);
        }
        s.finish()
    }
}

impl<R: Reason> Reason for Box<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn namespace(&self) -> &'static str {
        (**self).namespace()
    }

    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }

    fn reason_type_id(&self) -> TypeId {
        (**self).reason_type_id()
    }
}

impl<R: Reason> Reason for Arc<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn namespace(&self) -> &'static str {
        (**self).namespace()
    }

    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }

    fn reason_type_id(&self) -> TypeId {
        (**self).reason_type_id()
    }
}

crate::reason! {
    /// The reason of [`OK`](crate::OK): no error occurred.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NoError;
}

/// Splits a full type name into its namespace and its bare name.
///
/// Generic arguments are dropped before splitting, so
/// `app::io::Retry<app::Policy>` yields `("app::io", "Retry")`.
fn split_type_name(full: &'static str) -> (&'static str, &'static str) {
    let base = full.find('<').map_or(full, |generics| &full[..generics]);
    match base.rfind("::") {
        Some(separator) => (&base[..separator], &base[separator + 2..]),
        None => ("", base),
    }
}
