//! Staged visible, fading, hidden scheduling for short-lived surfaces.

use std::sync::PoisonError;

use tokio::time::sleep_until;
use tracing::trace;

use crate::sync::{Arc, Mutex};
use crate::time::{Clock, Duration, Instant};

/// Stage notifications for the host's rendering layer
pub trait TransientHooks: Send + Sync {
    fn shown(&self);

    fn fading(&self);

    fn hidden(&self);
}

/// Lifetime knobs of a transient surface
///
/// Defaults match a toast notification: visible for three seconds, then a
/// 300 ms dismiss animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransientSettings {
    linger: Duration,
    fade: Duration,
}

impl TransientSettings {
    /// Changes how long the surface stays fully visible
    pub fn with_linger(self, linger: Duration) -> Self {
        Self { linger, ..self }
    }

    /// Changes how long the dismiss animation runs
    pub fn with_fade(self, fade: Duration) -> Self {
        Self { fade, ..self }
    }

    pub fn linger(&self) -> Duration {
        self.linger
    }

    pub fn fade(&self) -> Duration {
        self.fade
    }
}

impl Default for TransientSettings {
    fn default() -> Self {
        Self {
            linger: Duration::from_millis(3000),
            fade: Duration::from_millis(300),
        }
    }
}

enum Phase {
    Hidden,
    Visible(Instant),
    Fading(Instant),
}

struct State {
    phase: Phase,
    generation: u64,
}

enum Step {
    Fade { generation: u64, deadline: Instant },
    Hide,
}

/// Driver for one transient surface, a toast, a loader overlay
///
/// `show` makes the surface visible and schedules the fade and hide stages;
/// showing again while visible extends the visible window without a
/// duplicate `shown` notification. `dismiss` skips what is left of the
/// visible window. Stage timers armed for an earlier show are ignored.
///
/// Cloning shares the same surface. Requires a running tokio runtime.
pub struct Transient<H> {
    state: Arc<Mutex<State>>,
    hooks: Arc<H>,
    settings: TransientSettings,
}

impl<H> Clone for Transient<H> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            hooks: Arc::clone(&self.hooks),
            settings: self.settings,
        }
    }
}

impl<H> Transient<H>
where
    H: TransientHooks + 'static,
{
    pub fn new(settings: TransientSettings, hooks: H) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                phase: Phase::Hidden,
                generation: 0,
            })),
            hooks: Arc::new(hooks),
            settings,
        }
    }

    /// Makes the surface visible for the configured linger window
    pub fn show(&self) {
        let deadline = Clock::now() + self.settings.linger;
        let (appeared, generation) = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let appeared = !matches!(state.phase, Phase::Visible(_));
            state.phase = Phase::Visible(deadline);
            state.generation = state.generation.wrapping_add(1);
            (appeared, state.generation)
        };

        if appeared {
            self.hooks.shown();
        }
        self.arm(generation, deadline);
    }

    /// Skips what is left of the visible window and starts the fade
    ///
    /// A hidden or already fading surface is left alone.
    pub fn dismiss(&self) {
        let deadline = Clock::now() + self.settings.fade;
        let generation = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            match state.phase {
                Phase::Visible(_) => {
                    state.phase = Phase::Fading(deadline);
                    state.generation = state.generation.wrapping_add(1);
                    Some(state.generation)
                }
                _ => None,
            }
        };

        if let Some(generation) = generation {
            self.hooks.fading();
            self.arm(generation, deadline);
        }
    }

    /// Reports whether the surface is on screen, fully visible or fading
    pub fn is_visible(&self) -> bool {
        !matches!(
            self.state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .phase,
            Phase::Hidden
        )
    }

    fn arm(&self, generation: u64, deadline: Instant) {
        let this = self.clone();

        tokio::spawn(async move {
            sleep_until(deadline).await;
            this.advance(generation);
        });
    }

    fn advance(&self, generation: u64) {
        let step = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.generation != generation {
                None
            } else {
                match state.phase {
                    Phase::Visible(_) => {
                        let deadline = Clock::now() + self.settings.fade;
                        state.phase = Phase::Fading(deadline);
                        state.generation = state.generation.wrapping_add(1);
                        Some(Step::Fade {
                            generation: state.generation,
                            deadline,
                        })
                    }
                    Phase::Fading(_) => {
                        state.phase = Phase::Hidden;
                        state.generation = state.generation.wrapping_add(1);
                        Some(Step::Hide)
                    }
                    Phase::Hidden => None,
                }
            }
        };

        match step {
            Some(Step::Fade {
                generation,
                deadline,
            }) => {
                self.hooks.fading();
                self.arm(generation, deadline);
            }
            Some(Step::Hide) => self.hooks.hidden(),
            None => trace!("stale stage timer ignored"),
        }
    }
}
