//! Commonly used items for convenient importing.
//!
//! # Usage
//!
//! ```rust
//! use reasoned_error::prelude::*;
//!
//! reason! {
//!     pub struct DivideByZero {
//!         pub dividend: i32,
//!     }
//! }
//!
//! fn divide(a: i32, b: i32) -> Result<i32, ReasonedError> {
//!     if b == 0 {
//!         return Err(ReasonedError::new(DivideByZero { dividend: a }));
//!     }
//!     Ok(a / b)
//! }
//!
//! assert_eq!(divide(10, 2).unwrap(), 5);
//! assert_eq!(
//!     divide(1, 0).unwrap_err().to_string(),
//!     "reason=DivideByZero, dividend=1"
//! );
//! ```

pub use crate::{FieldValue, Occasion, Reason, ReasonedError, reason};
