//! Core domain logic for the punch timer tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Timers and their start/end mark log
//! - Duration reconstruction: rebuilding elapsed time from marks
//! - The lifecycle event bus UI layers subscribe to
//! - Local calendar-day boundary math for day-scoped reports

pub mod bus;
pub mod day;
mod duration;
pub mod mark;
mod timer;
pub mod types;

pub use bus::{EventBus, StoreEvent, Subscription};
pub use duration::{Tally, reconstruct};
pub use mark::{MarkKind, TimeMark, UnknownMarkKind};
pub use timer::Timer;
pub use types::{TimerName, ValidationError};
