//! Timer engine module.
//!
//! The engine owns the countdown state and runs on its own tokio event loop.
//! Everything outside talks to it through [`TimerCommand`] messages and
//! observes it through [`TimerSnapshot`](crate::types::TimerSnapshot)
//! updates on a watch channel.

pub mod timer;

pub use timer::{TimerCommand, TimerEngine, TimerEvent};
