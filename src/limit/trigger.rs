use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

use crate::time::{Clock, Duration};

use super::{Debounce, Deferral, Pace, Pacer, Throttle};

/// Wraps `action` so a burst of trigger calls collapses into one trailing
/// invocation per quiet period of `wait`
///
/// The returned [`Trigger`] is cheap to clone and safe to call from any task.
/// The action runs on a dedicated worker with the arguments of the latest
/// call, `wait` after triggers stop arriving.
///
/// Must be called inside a tokio runtime.
pub fn debounce<T, A>(wait: Duration, action: A) -> Trigger<T>
where
    T: Send + 'static,
    A: FnMut(T) + Send + 'static,
{
    Trigger::spawn(Debounce::new(wait), action)
}

/// Wraps `action` so it fires at most once per window of `limit`
///
/// The leading call of every window fires without delay; calls made during
/// the cooldown are dropped.
///
/// Must be called inside a tokio runtime.
pub fn throttle<T, A>(limit: Duration, action: A) -> Trigger<T>
where
    T: Send + 'static,
    A: FnMut(T) + Send + 'static,
{
    Trigger::spawn(Throttle::new(limit), action)
}

/// Delivery failed because the pacing worker is gone
///
/// The worker lives as long as any [`Trigger`] handle does, so this only
/// happens after the wrapped action panicked or its runtime shut down.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("pacing worker is no longer running")]
pub struct TriggerError;

/// Handle feeding trigger calls into a pacing worker
///
/// Created by [`debounce`] and [`throttle`]. Dropping every handle shuts the
/// worker down, after letting a still-armed debounce deferral fire.
#[derive(Debug)]
pub struct Trigger<T> {
    calls: UnboundedSender<T>,
}

impl<T> Clone for Trigger<T> {
    fn clone(&self) -> Self {
        Self {
            calls: self.calls.clone(),
        }
    }
}

impl<T> Trigger<T>
where
    T: Send + 'static,
{
    fn spawn<P, A>(pacer: P, action: A) -> Self
    where
        P: Pacer + Send + 'static,
        A: FnMut(T) + Send + 'static,
    {
        let (calls, inbox) = mpsc::unbounded_channel();

        tokio::spawn(run_pacer(pacer, inbox, action));

        Self { calls }
    }

    /// Feeds one trigger call into the worker
    ///
    /// Never blocks and never runs the action in the caller's stack; a panic
    /// inside the action surfaces in the worker task, not here.
    pub fn call(&self, input: T) -> Result<(), TriggerError> {
        self.calls.send(input).map_err(|_| TriggerError)
    }
}

async fn run_pacer<P, T, A>(mut pacer: P, mut inbox: UnboundedReceiver<T>, mut action: A)
where
    P: Pacer,
    A: FnMut(T),
{
    let mut deferral = std::pin::pin!(Deferral::unarmed());

    loop {
        tokio::select! {
            call = inbox.recv() => match call {
                Some(input) => match pacer.on_trigger(Clock::now()) {
                    Pace::Fire => action(input),
                    Pace::Defer(deadline) => deferral.as_mut().arm(deadline, input),
                    Pace::Discard => trace!("trigger dropped during cooldown"),
                },
                None => break,
            },
            input = deferral.as_mut(), if deferral.is_armed() => {
                if pacer.on_deadline(Clock::now()) {
                    action(input);
                }
            }
        }
    }

    // All handles are gone; an already scheduled invocation still fires.
    if deferral.is_armed() {
        let input = deferral.as_mut().await;
        if pacer.on_deadline(Clock::now()) {
            action(input);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex, OnceLock};

    use tokio::time::sleep;

    use crate::test_util::CallLog;

    use super::{debounce, throttle, Duration, Trigger, TriggerError};

    #[tokio::test(start_paused = true)]
    async fn debounce_collapses_burst_into_one_trailing_call() {
        let log = CallLog::start();
        let trigger = debounce(Duration::from_millis(200), log.action());

        trigger.call(1).unwrap();
        sleep(Duration::from_millis(50)).await;
        trigger.call(2).unwrap();
        sleep(Duration::from_millis(50)).await;
        trigger.call(3).unwrap();
        sleep(Duration::from_millis(400)).await;

        log.verify(vec![(3, Duration::from_millis(300))]);
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_fires_once_per_quiet_period() {
        let log = CallLog::start();
        let trigger = debounce(Duration::from_millis(100), log.action());

        trigger.call("first").unwrap();
        sleep(Duration::from_millis(150)).await;
        trigger.call("second").unwrap();
        sleep(Duration::from_millis(150)).await;

        log.verify(vec![
            ("first", Duration::from_millis(100)),
            ("second", Duration::from_millis(250)),
        ]);
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_with_zero_wait_defers_to_the_next_worker_round() {
        let log = CallLog::start();
        let trigger = debounce(Duration::ZERO, log.action());

        trigger.call(9).unwrap();
        log.verify(vec![]);

        sleep(Duration::from_millis(1)).await;
        log.verify(vec![(9, Duration::ZERO)]);
    }

    #[tokio::test(start_paused = true)]
    async fn throttle_fires_leading_call_without_delay_and_drops_the_rest() {
        let log = CallLog::start();
        let trigger = throttle(Duration::from_millis(1000), log.action());

        trigger.call("a").unwrap();
        sleep(Duration::from_millis(200)).await;
        trigger.call("b").unwrap();
        sleep(Duration::from_millis(900)).await;
        trigger.call("c").unwrap();
        sleep(Duration::from_millis(1)).await;

        log.verify(vec![
            ("a", Duration::ZERO),
            ("c", Duration::from_millis(1100)),
        ]);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_deferral_fires_after_all_handles_are_dropped() {
        let log = CallLog::start();
        let trigger = debounce(Duration::from_millis(100), log.action());

        trigger.call(7).unwrap();
        drop(trigger);
        sleep(Duration::from_millis(150)).await;

        log.verify(vec![(7, Duration::from_millis(100))]);
    }

    #[tokio::test(start_paused = true)]
    async fn call_reports_an_error_once_the_worker_is_gone() {
        let trigger = throttle(Duration::from_millis(10), |_: u8| panic!("worker down"));

        trigger.call(1).unwrap();
        sleep(Duration::from_millis(1)).await;

        assert_eq!(trigger.call(2), Err(TriggerError));
    }

    #[tokio::test(start_paused = true)]
    async fn action_may_retrigger_its_own_wrapper() {
        let slot: Arc<OnceLock<Trigger<u32>>> = Arc::new(OnceLock::new());
        let fired = Arc::new(Mutex::new(Vec::new()));

        let trigger = throttle(Duration::from_millis(100), {
            let slot = Arc::clone(&slot);
            let fired = Arc::clone(&fired);
            move |value: u32| {
                fired.lock().unwrap().push(value);
                if let Some(trigger) = slot.get() {
                    let _ = trigger.call(value + 1);
                }
            }
        });
        slot.set(trigger.clone()).ok();

        trigger.call(1).unwrap();
        sleep(Duration::from_millis(50)).await;

        assert_eq!(*fired.lock().unwrap(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn cloned_handles_feed_the_same_worker() {
        let log = CallLog::start();
        let trigger = throttle(Duration::from_millis(500), log.action());
        let other = trigger.clone();

        trigger.call(1).unwrap();
        other.call(2).unwrap();
        sleep(Duration::from_millis(1)).await;

        log.verify(vec![(1, Duration::ZERO)]);
    }
}
