#[warn(
    missing_debug_implementations,
    missing_docs,
    unreachable_pub
)]
mod guard;
mod limit;
mod transient;

pub mod prelude;
pub mod time;

mod sync;

#[cfg(any(test, feature = "test_util"))]
mod test_util;

#[cfg(any(test, feature = "test_util"))]
pub use test_util::*;

pub use guard::*;
pub use limit::*;
pub use transient::*;
