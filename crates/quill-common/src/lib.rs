//! # Quill Common
//!
//! Shared types, utilities, and common functionality for the Quill bot.
//!
//! This crate provides the error taxonomy, identity newtypes, response
//! formatting, input validation and the retry policy used by every other
//! crate in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod format;
pub mod logging;
pub mod retry;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{QuillError, Result};
pub use format::*;
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use retry::{Backoff, RetryPolicy};
pub use types::*;
pub use validation::*;
