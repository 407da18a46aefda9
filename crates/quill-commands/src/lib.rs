//! # Quill Commands
//!
//! Discord slash commands for Quill, built on the Poise framework.
//!
//! Generation commands validate their input, hand a provider call to a
//! dispatcher, and turn the result into an embed. The help menu pages
//! through the commands the caller may use.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod admin;
pub mod dispatch;
pub mod framework;
pub mod general;
pub mod generate;
pub mod pagination;
pub mod registry;
pub mod reply;

pub use dispatch::{
    ApiCommandDispatcher, DispatchOutcome, DispatchRequest, Dispatcher, FailureKind,
    ImageCommandDispatcher, ImageOutcome, OutcomeFormatter, OutcomeKind, TextOutcome,
};
pub use framework::*;
pub use generate::{CommandOutcome, GenerationCommand, GENERATION_COMMANDS};
pub use pagination::{Page, PaginationController, PaginationError};
pub use registry::{CommandDescriptor, CommandRegistry, Visibility};
pub use reply::{Button, Embed, PoiseChannel, Reply, ReplyChannel};
