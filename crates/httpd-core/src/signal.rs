//! Translating asynchronous signal delivery into an idempotent shutdown
//! transition.
//!
//! `SIGTERM`, `SIGINT`, and `SIGQUIT` all mean "shut down"; only the
//! first delivery matters. The mechanism: a dedicated thread blocks on
//! [`signal_hook::iterator::Signals`] and sets a shared flag on the
//! first signal it observes, then stops consuming further signals.
//! Because the signal's default disposition is replaced by
//! `signal_hook`'s handler without `SA_RESTART`, any blocking syscall
//! the supervisor is parked in (`waitpid`) is interrupted with `EINTR`
//! at the same moment the flag becomes visible — the same effect a
//! hand-rolled self-pipe would produce, without a second descriptor to
//! register and drain.

use crate::error::HttpdError;
use nix::sys::signal::{self, SigHandler, Signal};
use signal_hook::consts::{SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle to the shutdown flag shared between the signal thread and the
/// supervisor's wait loop.
#[derive(Clone)]
pub struct ShutdownSignal {
    flag: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Install the translator: spawn the signal-handling thread and
    /// return a handle the caller polls from its wait loop.
    pub fn install() -> Result<Self, HttpdError> {
        let mut signals = Signals::new([SIGTERM, SIGINT, SIGQUIT]).map_err(HttpdError::Signal)?;
        let flag = Arc::new(AtomicBool::new(false));

        let thread_flag = Arc::clone(&flag);
        std::thread::spawn(move || {
            // Only the first signal is meaningful; once observed, the
            // thread stops iterating and further deliveries are left
            // unread by this process (the observable effect: ignored).
            if signals.forever().next().is_some() {
                thread_flag.store(true, Ordering::SeqCst);
            }
        });

        Ok(Self { flag })
    }

    /// True once the first shutdown signal has been observed.
    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Reset `SIGTERM`/`SIGINT`/`SIGQUIT` to their default disposition.
///
/// `fork()` inherits signal dispositions, not just pending signals: a
/// Worker forked after [`ShutdownSignal::install`] starts out with the
/// Supervisor's handler still installed, and nothing in a Worker ever
/// drains that handler's self-pipe. Left uncorrected, sending a Worker
/// one of these signals would be silently caught instead of
/// terminating it. Call this first thing in a freshly forked Worker,
/// before it does anything else — workers install no translators of
/// their own (§4.3: the default action terminates them promptly).
pub fn reset_to_default() -> nix::Result<()> {
    for sig in [Signal::SIGTERM, Signal::SIGINT, Signal::SIGQUIT] {
        // SAFETY: called single-threaded, immediately after fork and
        // before any other signal-handling state is touched.
        unsafe { signal::signal(sig, SigHandler::SigDfl) }?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unrequested() {
        let flag = Arc::new(AtomicBool::new(false));
        let signal = ShutdownSignal { flag };
        assert!(!signal.is_requested());
    }

    #[test]
    fn reflects_flag_flip() {
        let flag = Arc::new(AtomicBool::new(false));
        let signal = ShutdownSignal {
            flag: Arc::clone(&flag),
        };
        flag.store(true, Ordering::SeqCst);
        assert!(signal.is_requested());
    }

    #[test]
    fn reset_to_default_succeeds() {
        assert!(reset_to_default().is_ok());
    }
}
