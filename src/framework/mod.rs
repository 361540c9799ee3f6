pub mod config;
pub use config::Config;

pub mod data;
pub use data::DataError;

pub mod context;
pub mod event_handler;
pub mod logging;
pub mod timer;
