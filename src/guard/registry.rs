use std::sync::PoisonError;

use rustc_hash::FxHashMap;
use tokio::time::sleep_until;
use tracing::debug;

use crate::sync::{Arc, Mutex};
use crate::time::{Clock, Instant};

use super::{GuardFlag, GuardHooks, GuardSettings, NoopHooks, ReleaseCause, Subject};

struct Hold {
    flag: GuardFlag,
    generation: u64,
}

enum Enter {
    Held,
    Admitted {
        generation: u64,
        deadline: Instant,
        expired_previous: bool,
    },
}

impl Enter {
    #[cfg(test)]
    fn admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }
}

/// Transition bookkeeping shared between callers and release timers.
///
/// Holds expire by clock comparison inside [`GuardFlag`], so the latch stays
/// correct even when an armed timer is delivered late; the generation
/// counter turns timers armed for earlier holds into no-ops.
struct GuardCore<S> {
    holds: Mutex<FxHashMap<S, Hold>>,
    settings: GuardSettings,
}

impl<S> GuardCore<S>
where
    S: Subject,
{
    fn new(settings: GuardSettings) -> Self {
        Self {
            holds: Mutex::new(FxHashMap::default()),
            settings,
        }
    }

    fn try_enter(&self, subject: S, now: Instant) -> Enter {
        let mut holds = self.holds.lock().unwrap_or_else(PoisonError::into_inner);
        let hold = holds.entry(subject).or_insert_with(|| Hold {
            flag: GuardFlag::new(self.settings.release_after()),
            generation: 0,
        });

        let expired_previous = hold.flag.deadline().is_some() && !hold.flag.is_held(now);

        if !hold.flag.try_enter(now) {
            return Enter::Held;
        }

        hold.generation = hold.generation.wrapping_add(1);

        Enter::Admitted {
            generation: hold.generation,
            deadline: now + self.settings.release_after(),
            expired_previous,
        }
    }

    fn reset(&self, subject: S) -> bool {
        let mut holds = self.holds.lock().unwrap_or_else(PoisonError::into_inner);

        match holds.get_mut(&subject) {
            Some(hold) if hold.flag.deadline().is_some() => {
                hold.flag.reset();
                hold.generation = hold.generation.wrapping_add(1);
                true
            }
            _ => false,
        }
    }

    fn expire(&self, subject: S, generation: u64) -> bool {
        let mut holds = self.holds.lock().unwrap_or_else(PoisonError::into_inner);

        match holds.get_mut(&subject) {
            Some(hold) if hold.generation == generation && hold.flag.deadline().is_some() => {
                hold.flag.reset();
                true
            }
            _ => false,
        }
    }

    fn is_held(&self, subject: S, now: Instant) -> bool {
        self.holds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&subject)
            .map_or(false, |hold| hold.flag.is_held(now))
    }
}

/// Subject-keyed guard with hook notifications and timed auto-release
///
/// Owns the mapping from subject identity to its [`GuardFlag`], so there is
/// no hidden process-wide state; whichever component manages the subjects
/// owns the registry. Cloning shares the same underlying state.
///
/// `try_enter` arms an auto-release timer, which requires a running tokio
/// runtime.
pub struct GuardRegistry<S, H = NoopHooks>
where
    S: Subject,
{
    core: Arc<GuardCore<S>>,
    hooks: Arc<H>,
}

impl<S, H> Clone for GuardRegistry<S, H>
where
    S: Subject,
{
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            hooks: Arc::clone(&self.hooks),
        }
    }
}

impl<S> GuardRegistry<S, NoopHooks>
where
    S: Subject + Send + Sync + 'static,
{
    /// Creates a registry without transition hooks
    pub fn new(settings: GuardSettings) -> Self {
        Self::with_hooks(settings, NoopHooks)
    }
}

impl<S, H> GuardRegistry<S, H>
where
    S: Subject + Send + Sync + 'static,
    H: GuardHooks + 'static,
{
    /// Creates a registry notifying `hooks` on every transition
    pub fn with_hooks(settings: GuardSettings, hooks: H) -> Self {
        Self {
            core: Arc::new(GuardCore::new(settings)),
            hooks: Arc::new(hooks),
        }
    }

    /// Attempts to open a hold for `subject`
    ///
    /// Returns `true` on a released subject and arms the auto-release
    /// timer; returns `false` while the subject's hold is active. Hooks run
    /// after the internal lock is dropped.
    pub fn try_enter(&self, subject: S) -> bool {
        match self.core.try_enter(subject, Clock::now()) {
            Enter::Held => false,
            Enter::Admitted {
                generation,
                deadline,
                expired_previous,
            } => {
                if expired_previous {
                    self.hooks.released(subject.name(), ReleaseCause::Expired);
                }
                self.hooks.entered(subject.name());
                self.arm_release(subject, generation, deadline);
                true
            }
        }
    }

    /// Releases the subject's hold
    ///
    /// A released subject stays released; calling this twice has the same
    /// effect as once and notifies hooks at most once.
    pub fn reset(&self, subject: S) {
        if self.core.reset(subject) {
            self.hooks.released(subject.name(), ReleaseCause::Manual);
        }
    }

    /// Reports whether the subject's hold is active
    pub fn is_held(&self, subject: S) -> bool {
        self.core.is_held(subject, Clock::now())
    }

    fn arm_release(&self, subject: S, generation: u64, deadline: Instant) {
        let core = Arc::clone(&self.core);
        let hooks = Arc::clone(&self.hooks);

        tokio::spawn(async move {
            sleep_until(deadline).await;

            if core.expire(subject, generation) {
                debug!(subject = subject.name(), "hold expired without completion signal");
                hooks.released(subject.name(), ReleaseCause::Expired);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::sleep;

    use crate::test_util::HookLog;
    use crate::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn releases_hold_once_release_window_elapses() {
        let registry = GuardRegistry::new(GuardSettings::default());

        assert!(registry.try_enter("form"));
        sleep(Duration::from_millis(1000)).await;
        assert!(!registry.try_enter("form"));
        sleep(Duration::from_millis(4001)).await;
        assert!(registry.try_enter("form"));
    }

    #[tokio::test(start_paused = true)]
    async fn notifies_hooks_on_every_transition() {
        let log = HookLog::default();
        let registry = GuardRegistry::with_hooks(GuardSettings::default(), log.clone());

        registry.try_enter("save");
        registry.reset("save");
        registry.try_enter("save");
        sleep(Duration::from_millis(5001)).await;

        log.verify(vec![
            "entered:save",
            "released:save:manual",
            "entered:save",
            "released:save:expired",
        ]);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_of_a_released_subject_is_a_noop() {
        let log = HookLog::default();
        let registry = GuardRegistry::with_hooks(GuardSettings::default(), log.clone());

        registry.reset("form");
        registry.try_enter("form");
        registry.reset("form");
        registry.reset("form");

        log.verify(vec!["entered:form", "released:form:manual"]);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_release_timer_does_not_touch_a_newer_hold() {
        let log = HookLog::default();
        let registry = GuardRegistry::with_hooks(GuardSettings::default(), log.clone());

        registry.try_enter("form");
        sleep(Duration::from_millis(1000)).await;
        registry.reset("form");
        sleep(Duration::from_millis(1000)).await;
        registry.try_enter("form");

        sleep(Duration::from_millis(3500)).await;
        assert!(registry.is_held("form"));

        sleep(Duration::from_millis(1501)).await;
        log.verify(vec![
            "entered:form",
            "released:form:manual",
            "entered:form",
            "released:form:expired",
        ]);
    }

    #[tokio::test(start_paused = true)]
    async fn guards_subjects_independently() {
        let registry = GuardRegistry::new(GuardSettings::default());

        assert!(registry.try_enter("checkout"));
        assert!(registry.try_enter("newsletter"));
        assert!(!registry.try_enter("checkout"));

        registry.reset("checkout");

        assert!(registry.try_enter("checkout"));
        assert!(!registry.try_enter("newsletter"));
    }

    #[test]
    fn lazy_expiry_reports_the_previous_hold_as_released() {
        let core = GuardCore::new(GuardSettings::default());
        let start = Instant::now();

        core.try_enter("form", start);

        match core.try_enter("form", start + Duration::from_millis(6000)) {
            Enter::Admitted {
                expired_previous, ..
            } => assert!(expired_previous),
            Enter::Held => panic!("expired hold should admit a new enter"),
        }
    }

    #[test]
    fn admits_exactly_one_racing_enter() {
        loom::model(|| {
            let core = Arc::new(GuardCore::new(GuardSettings::default()));
            let now = Instant::now();

            let first = {
                let core = Arc::clone(&core);
                loom::thread::spawn(move || core.try_enter("form", now).admitted())
            };

            let second = core.try_enter("form", now).admitted();
            let first = first.join().unwrap();

            assert!(first ^ second);
        });
    }
}
