use std::fmt::{Display, Formatter};

/// Why a hold went back to released
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ReleaseCause {
    /// The host reported completion through `reset`
    Manual,
    /// The auto-release window elapsed without a completion signal
    Expired,
}

impl Display for ReleaseCause {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(match self {
            Self::Manual => "manual",
            Self::Expired => "expired",
        })
    }
}

/// Transition notifications for the host's busy treatment
///
/// Every `entered` is followed by exactly one `released`. Hooks run outside
/// the registry lock, so an implementation may call back into the registry.
pub trait GuardHooks: Send + Sync {
    fn entered(&self, subject: &str);

    fn released(&self, subject: &str, cause: ReleaseCause);
}

/// Hooks that ignore every transition
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl GuardHooks for NoopHooks {
    fn entered(&self, _subject: &str) {}

    fn released(&self, _subject: &str, _cause: ReleaseCause) {}
}
