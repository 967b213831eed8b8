use crate::time::{Duration, Instant};

use super::{Pace, Pacer};

/// Pacer that caps invocation frequency to one leading call per window
///
/// The first trigger after any cooldown fires immediately and opens a new
/// cooldown of `limit`; triggers arriving during the cooldown are dropped.
/// Cooldowns always run to completion, there is no cancellation.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    limit: Duration,
    cooldown_until: Option<Instant>,
}

impl Throttle {
    /// Creates a throttle pacer with the provided cooldown window
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            cooldown_until: None,
        }
    }
}

impl Pacer for Throttle {
    fn on_trigger(&mut self, now: Instant) -> Pace {
        match self.cooldown_until {
            Some(until) if now < until => Pace::Discard,
            _ => {
                self.cooldown_until = Some(now + self.limit);
                Pace::Fire
            }
        }
    }

    fn on_deadline(&mut self, _now: Instant) -> bool {
        false
    }
}
