//! Alert lifecycle events for embedders.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::AlertEventDispatcher;
pub use handler::AlertEventHandler;
pub use types::*;
