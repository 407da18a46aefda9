//! # Quill Bot
//!
//! Discord bot relaying slash commands to text and image generation services.
//!
//! This is the main binary crate: it parses flags, initialises logging, loads
//! configuration and runs the Poise client until shutdown.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod cli;
pub mod error;

pub use bot::*;
pub use cli::Args;
pub use error::*;
