#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]

pub mod chat;
pub mod cli;
pub mod commands;
pub mod corpus;
pub mod emotes;
pub mod errors;
pub mod framework;
pub mod games;
pub mod permission;
pub mod points;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{CommandError, Error};
pub use framework::event_handler::{Dispatcher, Event};
