//! Monotonic clock used by every timed component in the crate.

#[doc(hidden)]
pub use std::time::Duration;

#[doc(hidden)]
pub use tokio::time::Instant;

/// Clock backed by tokio's time driver
///
/// Pausing the driver with [`tokio::time::pause`] freezes [`Clock::now`],
/// and [`tokio::time::advance`] moves it forward deterministically, which is
/// how every timed behavior in this crate is tested.
pub struct Clock;

impl Clock {
    /// Returns the current monotonic time
    ///
    /// # Example
    /// ```
    /// use tokio::time::{advance, resume};
    /// use quiesce::time::{Clock, Duration};
    ///
    /// #[tokio::main(flavor = "current_thread", start_paused = true)]
    /// async fn main() {
    ///     let time = Clock::now();
    ///     assert_eq!(Clock::now(), time);
    ///     advance(Duration::from_millis(10)).await;
    ///     assert_eq!(Clock::now(), time + Duration::from_millis(10));
    ///     resume();
    ///     assert_ne!(Clock::now(), time + Duration::from_millis(10));
    /// }
    /// ```
    pub fn now() -> Instant {
        Instant::now()
    }
}
