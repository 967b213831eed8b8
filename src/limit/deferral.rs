use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use pin_project_lite::pin_project;
use tokio::time::{sleep_until, Instant, Sleep};

pin_project! {
    /// Holds the latest deferred arguments until their deadline passes.
    ///
    /// Re-arming replaces both the payload and the deadline, which is how a
    /// debounce burst keeps only its last call. Resolves to the payload; an
    /// unarmed deferral is never ready.
    pub(crate) struct Deferral<T> {
        #[pin]
        sleep: Sleep,
        payload: Option<T>,
    }
}

impl<T> Deferral<T> {
    /// Creates an unarmed deferral. Must be called inside a runtime.
    pub(crate) fn unarmed() -> Self {
        Self {
            sleep: sleep_until(Instant::now()),
            payload: None,
        }
    }

    pub(crate) fn arm(self: Pin<&mut Self>, deadline: Instant, input: T) {
        let this = self.project();
        *this.payload = Some(input);
        this.sleep.reset(deadline);
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.payload.is_some()
    }
}

impl<T> Future for Deferral<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        if this.sleep.poll(cx).is_ready() {
            if let Some(input) = this.payload.take() {
                return Poll::Ready(input);
            }
        }

        Poll::Pending
    }
}
