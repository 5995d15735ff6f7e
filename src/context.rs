// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Cancellation context threaded through badge rendering.
//!
//! A [`Context`] observes a `tokio::sync::watch` channel. Rendering checks it
//! once at entry, so a cancelled context never yields partial SVG output.

use std::sync::Arc;

use tokio::sync::watch;

/// Read side of a cancellation signal.
#[derive(Debug, Clone)]
pub struct Context {
    receiver: watch::Receiver<bool>
}

/// Write side of a cancellation signal created by [`Context::with_cancel`].
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>
}

impl Context {
    /// Returns a context that is never cancelled.
    pub fn background() -> Self {
        let (_sender, receiver) = watch::channel(false);
        Self {
            receiver
        }
    }

    /// Returns a context paired with the handle that cancels it.
    ///
    /// # Example
    ///
    /// ```
    /// use covbadge::Context;
    ///
    /// let (context, handle) = Context::with_cancel();
    /// assert!(!context.is_cancelled());
    /// handle.cancel();
    /// assert!(context.is_cancelled());
    /// ```
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        (
            Self {
                receiver
            },
            CancelHandle {
                sender: Arc::new(sender)
            }
        )
    }

    /// Reports whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl CancelHandle {
    /// Requests cancellation for every clone of the paired context.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

#[cfg(test)]
mod tests {
    use super::Context;

    #[test]
    fn background_context_is_never_cancelled() {
        let context = Context::background();
        assert!(!context.is_cancelled());
    }

    #[test]
    fn cancel_is_observed_by_clones() {
        let (context, handle) = Context::with_cancel();
        let clone = context.clone();
        handle.cancel();
        assert!(context.is_cancelled());
        assert!(clone.is_cancelled());
    }
}
