//! Single import for the commonly used parts of the crate.

pub use crate::guard::{
    GuardFlag, GuardHooks, GuardRegistry, GuardSettings, NoopHooks, ReleaseCause, Subject,
};
pub use crate::limit::{debounce, throttle, Debounce, Pace, Pacer, Throttle, Trigger, TriggerError};
pub use crate::time::Clock;
pub use crate::transient::{Transient, TransientHooks, TransientSettings};
