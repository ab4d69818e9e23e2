/// Declares a reason struct and implements [`Reason`](crate::Reason) for it.
///
/// The macro accepts a unit struct or a struct with named fields, with any
/// attributes and doc comments on the struct and its fields. The generated
/// implementation:
///
/// - returns the struct's identifier from [`Reason::name`],
/// - returns the declaring module's path from [`Reason::namespace`],
/// - lists every field declared plainly `pub` from [`Reason::fields`], in
///   declaration order. Fields with no visibility or a restricted one such as
///   `pub(crate)` are private to the situation.
///
/// Each `pub` field's type must implement [`FieldValue`], i.e. be `Debug`,
/// `Display`, `Send`, `Sync` and `'static`. Private fields have no such
/// requirement.
///
/// Generic or tuple reason structs are not supported by the macro; implement
/// [`Reason`](crate::Reason) by hand for those.
///
/// # Examples
///
/// ```
/// use reasoned_error::{ReasonedError, reason};
///
/// reason! {
///     /// The file could not be opened.
///     #[derive(Debug, Clone)]
///     pub struct FailToOpenFile {
///         pub path: String,
///         pub mode: &'static str,
///         retries: Vec<u32>,
///     }
/// }
///
/// reason! {
///     pub struct Timeout;
/// }
///
/// let err = ReasonedError::new(FailToOpenFile {
///     path: "/etc/app.toml".to_string(),
///     mode: "r",
///     retries: vec![],
/// });
/// assert_eq!(
///     err.to_string(),
///     "reason=FailToOpenFile, path=/etc/app.toml, mode=r"
/// );
/// assert_eq!(ReasonedError::new(Timeout).to_string(), "reason=Timeout");
/// ```
///
/// [`Reason::name`]: crate::Reason::name
/// [`Reason::namespace`]: crate::Reason::namespace
/// [`Reason::fields`]: crate::Reason::fields
/// [`FieldValue`]: crate::FieldValue
#[macro_export]
macro_rules! reason {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident;
    ) => {
        $(#[$meta])*
        $vis struct $name;

        impl $crate::Reason for $name {
            fn name(&self) -> &'static str {
                ::core::stringify!($name)
            }

            fn namespace(&self) -> &'static str {
                ::core::module_path!()
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident { $($body:tt)* }
    ) => {
        $(#[$meta])*
        $vis struct $name { $($body)* }

        impl $crate::Reason for $name {
            fn name(&self) -> &'static str {
                ::core::stringify!($name)
            }

            fn namespace(&self) -> &'static str {
                ::core::module_path!()
            }

            #[allow(unused_mut, unused_variables)]
            fn fields(&self) -> $crate::__private::Vec<$crate::Field<'_>> {
                let this = self;
                let mut fields = $crate::__private::Vec::new();
                $crate::__reason_fields!(this, fields; $($body)*);
                fields
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __reason_fields {
    ($this:ident, $fields:ident; ) => {};
    (
        $this:ident, $fields:ident;
        $(#[$fmeta:meta])* pub $field:ident : $fty:ty $(, $($rest:tt)*)?
    ) => {
        $fields.push($crate::Field::new(::core::stringify!($field), &$this.$field));
        $crate::__reason_fields!($this, $fields; $($($rest)*)?);
    };
    (
        $this:ident, $fields:ident;
        $(#[$fmeta:meta])* pub ($($restriction:tt)*) $field:ident : $fty:ty $(, $($rest:tt)*)?
    ) => {
        $crate::__reason_fields!($this, $fields; $($($rest)*)?);
    };
    (
        $this:ident, $fields:ident;
        $(#[$fmeta:meta])* $field:ident : $fty:ty $(, $($rest:tt)*)?
    ) => {
        $crate::__reason_fields!($this, $fields; $($($rest)*)?);
    };
}
