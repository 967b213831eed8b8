//! Re-entry protection for subjects with an in-flight operation.

pub use std::hash::Hash;

pub use flag::GuardFlag;
pub use hooks::{GuardHooks, NoopHooks, ReleaseCause};
pub use registry::GuardRegistry;
pub use settings::GuardSettings;

mod flag;
mod hooks;
mod registry;
mod settings;

/// Identity of a guarded subject, a form, a button, an overlay
///
/// Doubles as the registry map key and as the human readable label handed to
/// hooks and logs.
pub trait Subject: Hash + Eq + Copy {
    fn name(&self) -> &str;
}

impl Subject for &str {
    fn name(&self) -> &str {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Hash, PartialEq, Eq, Debug, Copy, Clone)]
    enum TestSubject {
        CheckoutForm,
        SaveButton,
    }

    impl Subject for TestSubject {
        fn name(&self) -> &'static str {
            match self {
                Self::CheckoutForm => "checkout_form",
                Self::SaveButton => "save_button",
            }
        }
    }

    #[test]
    fn auto_applies_subject_to_static_str() {
        assert_eq!("submit", "submit".name());
    }

    #[test]
    fn verify_subject_can_be_used_as_hashmap_key() {
        let mut map = HashMap::new();

        *map.entry(TestSubject::CheckoutForm).or_default() += 1usize;
        *map.entry(TestSubject::SaveButton).or_default() += 2;
        *map.entry(TestSubject::SaveButton).or_default() += 3;

        assert_eq!(
            HashMap::from([(TestSubject::CheckoutForm, 1), (TestSubject::SaveButton, 5)]),
            map
        )
    }
}
