use crate::time::Duration;

/// Guard behavior knobs
///
/// The auto-release window defaults to five seconds, a recovery heuristic
/// rather than a measured timeout, so hosts with slower backends should
/// raise it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuardSettings {
    release_after: Duration,
}

impl GuardSettings {
    /// Changes how long a hold survives without a completion signal
    ///
    /// # Arguments
    ///
    /// * `release_after`: auto-release window for every hold
    pub fn with_release_after(self, release_after: Duration) -> Self {
        Self { release_after }
    }

    /// Returns current auto-release window
    pub fn release_after(&self) -> Duration {
        self.release_after
    }
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            release_after: Duration::from_millis(5000),
        }
    }
}
