use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use crate::guard::{GuardHooks, ReleaseCause};
use crate::time::{Clock, Duration, Instant};
use crate::transient::TransientHooks;

/// Records every invocation of a paced action with its offset from `start`
///
/// Offsets are exact under a paused tokio clock, which makes firing times
/// directly assertable.
pub struct CallLog<T> {
    origin: Instant,
    calls: Arc<Mutex<Vec<(T, Duration)>>>,
}

impl<T> Clone for CallLog<T> {
    fn clone(&self) -> Self {
        Self {
            origin: self.origin,
            calls: Arc::clone(&self.calls),
        }
    }
}

impl<T> CallLog<T>
where
    T: Send + PartialEq + Debug + 'static,
{
    pub fn start() -> Self {
        Self {
            origin: Clock::now(),
            calls: Arc::default(),
        }
    }

    /// Action recording each call it receives
    pub fn action(&self) -> impl FnMut(T) + Send + 'static {
        let origin = self.origin;
        let calls = Arc::clone(&self.calls);

        move |input| {
            calls
                .lock()
                .unwrap()
                .push((input, Clock::now() - origin));
        }
    }

    pub fn verify(&self, expected: Vec<(T, Duration)>) {
        assert_eq!(*self.calls.lock().unwrap(), expected);
    }
}

/// Guard hooks recording transitions as `entered:name` / `released:name:cause`
#[derive(Clone, Default)]
pub struct HookLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl HookLog {
    pub fn verify(&self, expected: Vec<&str>) {
        assert_eq!(
            self.entries
                .lock()
                .unwrap()
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>(),
            expected,
        );
    }
}

impl GuardHooks for HookLog {
    fn entered(&self, subject: &str) {
        self.entries
            .lock()
            .unwrap()
            .push(format!("entered:{}", subject));
    }

    fn released(&self, subject: &str, cause: ReleaseCause) {
        self.entries
            .lock()
            .unwrap()
            .push(format!("released:{}:{}", subject, cause));
    }
}

/// Transient hooks recording each stage with its offset from `start`
#[derive(Clone)]
pub struct StageLog {
    origin: Instant,
    entries: Arc<Mutex<Vec<(&'static str, Duration)>>>,
}

impl StageLog {
    pub fn start() -> Self {
        Self {
            origin: Clock::now(),
            entries: Arc::default(),
        }
    }

    fn record(&self, stage: &'static str) {
        self.entries
            .lock()
            .unwrap()
            .push((stage, Clock::now() - self.origin));
    }

    pub fn verify(&self, expected: Vec<(&str, Duration)>) {
        assert_eq!(*self.entries.lock().unwrap(), expected);
    }
}

impl TransientHooks for StageLog {
    fn shown(&self) {
        self.record("shown");
    }

    fn fading(&self) {
        self.record("fading");
    }

    fn hidden(&self) {
        self.record("hidden");
    }
}
