//! Pacing policies for high-frequency trigger streams.

use crate::time::Instant;

pub use self::{
    debounce::Debounce,
    throttle::Throttle,
    trigger::{debounce, throttle, Trigger, TriggerError},
};

mod debounce;
mod deferral;
mod throttle;
mod trigger;

pub(crate) use deferral::Deferral;

/// Verdict of a [`Pacer`] for a single trigger call
///
/// Produced by [`Pacer::on_trigger`] and consumed by the pacing worker,
/// which turns it into an action invocation, an armed deadline or a no-op.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Pace {
    /// Invoke the action right away with the call's arguments
    Fire,
    /// Hold the call's arguments and fire them once the deadline passes
    /// without being superseded by a later trigger
    Defer(Instant),
    /// Drop the call entirely, neither queued nor merged
    Discard,
}

/// Policy deciding the fate of every trigger call
///
/// Implementations are plain state machines over [`Instant`] values; they
/// schedule nothing themselves, which keeps them testable without a runtime.
/// The pacing worker created by [`debounce`] and [`throttle`] owns the timer
/// side.
pub trait Pacer {
    /// Decides what happens to a trigger call arriving at `now`
    fn on_trigger(&mut self, now: Instant) -> Pace;

    /// Notifies the policy that a deadline from an earlier [`Pace::Defer`]
    /// has elapsed
    ///
    /// Returns whether the held arguments fire. A deadline superseded by a
    /// later trigger reports `false`.
    fn on_deadline(&mut self, now: Instant) -> bool;
}
