use crate::time::{Duration, Instant};

use super::{Pace, Pacer};

/// Pacer that collapses a burst of triggers into one trailing invocation
///
/// Every trigger supersedes the pending deadline, so the action fires only
/// after a quiet period of `wait` with no further triggers. While triggers
/// keep arriving closer together than `wait` it never fires at all.
///
/// # Examples
///
/// ```
/// use quiesce::{Debounce, Pace, Pacer};
/// use quiesce::time::{Duration, Instant};
///
/// let mut pacer = Debounce::new(Duration::from_millis(200));
/// let start = Instant::now();
///
/// assert_eq!(
///     pacer.on_trigger(start),
///     Pace::Defer(start + Duration::from_millis(200))
/// );
/// assert_eq!(
///     pacer.on_trigger(start + Duration::from_millis(50)),
///     Pace::Defer(start + Duration::from_millis(250))
/// );
/// assert!(pacer.on_deadline(start + Duration::from_millis(250)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    wait: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    /// Creates a debounce pacer with the provided quiet period
    ///
    /// A zero `wait` still defers every trigger to the worker's next
    /// scheduling round; it never fires inside the trigger call itself.
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }
}

impl Pacer for Debounce {
    fn on_trigger(&mut self, now: Instant) -> Pace {
        let deadline = now + self.wait;
        self.deadline = Some(deadline);
        Pace::Defer(deadline)
    }

    fn on_deadline(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
