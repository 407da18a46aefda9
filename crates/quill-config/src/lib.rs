//! # Quill Config
//!
//! Type-safe configuration for the Quill bot.
//!
//! Configuration is read once at startup from environment variables and a
//! JSON prompt-template file, validated as a whole, and then shared
//! read-only for the lifetime of the process.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod prompts;
pub mod schema;

pub use loader::*;
pub use prompts::*;
pub use schema::*;
