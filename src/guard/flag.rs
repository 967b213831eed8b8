use crate::time::{Duration, Instant};

/// Latch preventing re-entry while a subject's operation is in flight
///
/// A hold opened by [`try_enter`] lasts until [`reset`] or until
/// `release_after` elapses, whichever comes first. Expiry is decided by the
/// clock alone, so a host that failed to deliver its completion signal can
/// always recover.
///
/// # Examples
///
/// ```
/// use quiesce::GuardFlag;
/// use quiesce::time::{Duration, Instant};
///
/// let mut flag = GuardFlag::new(Duration::from_secs(5));
/// let start = Instant::now();
///
/// assert!(flag.try_enter(start));
/// assert!(!flag.try_enter(start + Duration::from_secs(1)));
/// assert!(flag.try_enter(start + Duration::from_millis(5001)));
/// ```
///
/// [`try_enter`]: GuardFlag::try_enter
/// [`reset`]: GuardFlag::reset
#[derive(Debug, Clone, Copy)]
pub struct GuardFlag {
    held_until: Option<Instant>,
    release_after: Duration,
}

impl GuardFlag {
    /// Creates a released flag with the provided auto-release window
    pub fn new(release_after: Duration) -> Self {
        Self {
            held_until: None,
            release_after,
        }
    }

    /// Attempts to open a hold at `now`
    ///
    /// Returns `true` and arms the release deadline when the flag is
    /// released or its previous hold has expired; returns `false` while a
    /// hold is active.
    pub fn try_enter(&mut self, now: Instant) -> bool {
        match self.held_until {
            Some(until) if now < until => false,
            _ => {
                self.held_until = Some(now + self.release_after);
                true
            }
        }
    }

    /// Releases the hold; a released flag stays released
    pub fn reset(&mut self) {
        self.held_until = None;
    }

    /// Reports whether a hold is active at `now`
    pub fn is_held(&self, now: Instant) -> bool {
        matches!(self.held_until, Some(until) if now < until)
    }

    /// Release deadline of the current hold, expired or not
    pub fn deadline(&self) -> Option<Instant> {
        self.held_until
    }
}
