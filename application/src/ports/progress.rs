//! Tick progress port
//!
//! Defines the interface for observing the conversation driver tick by tick.

use crate::use_cases::run_conversation::{DriverError, TickReport};

/// Callback for progress updates from the conversation driver
///
/// Implementations live in the presentation layer.
pub trait TickProgressNotifier: Send + Sync {
    /// Called before the first step of a tick
    fn on_tick_start(&self, tick: u64);

    /// Called after all four entries of a tick were produced
    fn on_tick_complete(&self, report: &TickReport);

    /// Called when a tick was abandoned
    fn on_tick_failed(&self, tick: u64, error: &DriverError);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoTickProgress;

impl TickProgressNotifier for NoTickProgress {
    fn on_tick_start(&self, _tick: u64) {}
    fn on_tick_complete(&self, _report: &TickReport) {}
    fn on_tick_failed(&self, _tick: u64, _error: &DriverError) {}
}
