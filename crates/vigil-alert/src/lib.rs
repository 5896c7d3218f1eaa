//! # vigil-alert
//!
//! Threshold evaluation and alert lifecycle: [`Condition`]s grouped into
//! per-level [`Circumstance`]s, [`Watch`]es that drive a red/amber/green
//! state machine per series and instance, and the [`AlertService`] that owns
//! the watch and alert registries and runs the evaluation tick.

pub mod alert;
pub mod circumstance;
pub mod condition;
pub mod events;
pub mod level;
pub mod scheduler;
pub mod service;
pub mod watch;

pub use alert::{Alert, AlertStatistics, AlertStatus};
pub use circumstance::{Circumstance, Suppression};
pub use condition::{Condition, Operator, Window};
pub use events::{AlertEventDispatcher, AlertEventHandler};
pub use level::Level;
pub use scheduler::AlertScheduler;
pub use service::{AlertService, Clock, TickReport};
pub use watch::{KeyLevel, Watch, WatchStatus};
