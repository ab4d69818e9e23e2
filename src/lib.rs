#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_core,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Errors that say *why* they happened.
//!
//! ## Overview
//!
//! This crate provides [`ReasonedError`], an error value built around a
//! **reason**: a struct whose type names what went wrong and whose fields
//! describe the situation in which it went wrong. Instead of matching on
//! message strings or error codes, callers match on the reason type and read
//! its fields directly.
//!
//! Each error also records the file and line at which it was created, and
//! may wrap a **cause**, any other error that led to it, forming a chain that
//! the standard [`Error::source`](core::error::Error::source) walks.
//!
//! ## Quick Example
//!
//! ```
//! use reasoned_error::{ReasonedError, reason};
//!
//! reason! {
//!     #[derive(Debug)]
//!     pub struct FailToReadConfig {
//!         pub path: String,
//!     }
//! }
//!
//! fn read_config(path: &str) -> Result<String, ReasonedError> {
//!     std::fs::read_to_string(path).map_err(|cause| {
//!         ReasonedError::with_cause(
//!             FailToReadConfig {
//!                 path: path.to_string(),
//!             },
//!             cause,
//!         )
//!     })
//! }
//!
//! let err = read_config("/nonexistent/app.toml").unwrap_err();
//! assert_eq!(err.reason_name(), "FailToReadConfig");
//! assert!(err.cause().is_some());
//!
//! if let Some(reason) = err.reason().downcast_ref::<FailToReadConfig>() {
//!     println!("could not read {}", reason.path);
//! }
//! ```
//!
//! ## Core Concepts
//!
//! - **Reason** ([`Reason`]): a typed record of why an error occurred. Use
//!   the [`reason!`] macro to declare one.
//! - **Situation** ([`ReasonedError::situation`]): the public fields of the
//!   reason, by name.
//! - **Cause** ([`ReasonedError::cause`]): the wrapped error, if any.
//! - **No error** ([`OK`], [`NoError`]): the canonical value for success.
//!
//! ## Creation Notification
//!
//! Handlers registered with [`add_sync_handler`] and [`add_async_handler`]
//! are called for every constructed error, once [`fix_configuration`] has
//! closed registration. See the [`notify`] module for details, and
//! [`Notifier`] for independent, explicitly owned registries.
//!
//! ## String Form
//!
//! The [`Display`](core::fmt::Display) form of an error lists the reason
//! name, each public field, and the cause:
//!
//! ```text
//! reason=InvalidValue, value=abc, cause=reason=FailToGetValue, name=foo
//! ```

mod macros;

mod error;
mod handler_lock;
pub mod notify;
pub mod prelude;
pub mod reason;
mod util;

pub use self::{
    error::{Cause, OK, ReasonedError},
    notify::{
        ErrorHandler, Notifier, Occasion, add_async_handler, add_sync_handler, fix_configuration,
    },
    reason::{Field, FieldValue, NoError, Reason, Situation},
};

#[doc(hidden)]
pub mod __private {
    pub use std::vec::Vec;
}
