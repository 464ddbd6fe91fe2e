//! Detachment from the controlling terminal (daemonization).
//!
//! Equivalent to the original source's `daemon(0, 0)` call: fork once
//! (the parent exits immediately), start a new session, change the
//! working directory to `/`, and redirect the three standard streams
//! to the null device. Must run after the logging sink has been
//! selected (§4.1 step 1) since the diagnostic stream itself may be
//! redirected by this step.

use crate::error::HttpdError;
use nix::fcntl::OFlag;
use nix::sys::stat::Mode;
use nix::unistd::{self, ForkResult};
use std::os::fd::AsRawFd;

/// Detach from the controlling terminal. Only called when the operator
/// did not request foreground operation.
pub fn detach() -> Result<(), HttpdError> {
    // SAFETY: single-threaded at this point in startup (called before
    // any worker is spawned and before any additional threads exist);
    // the parent branch only calls the async-signal-safe `_exit`.
    match unsafe { unistd::fork() }.map_err(HttpdError::Daemonize)? {
        ForkResult::Parent { .. } => {
            // SAFETY: _exit is async-signal-safe and skips Rust/C
            // atexit handlers, avoiding a double-flush of any buffered
            // output inherited from the parent.
            unsafe { libc::_exit(0) };
        }
        ForkResult::Child => {}
    }

    unistd::setsid().map_err(HttpdError::Daemonize)?;
    unistd::chdir("/").map_err(HttpdError::Daemonize)?;
    redirect_stdio()?;

    Ok(())
}

fn redirect_stdio() -> Result<(), HttpdError> {
    let dev_null = nix::fcntl::open("/dev/null", OFlag::O_RDWR, Mode::empty())
        .map_err(HttpdError::Daemonize)?;

    for fd in [
        std::io::stdin().as_raw_fd(),
        std::io::stdout().as_raw_fd(),
        std::io::stderr().as_raw_fd(),
    ] {
        unistd::dup2(dev_null, fd).map_err(HttpdError::Daemonize)?;
    }

    unistd::close(dev_null).map_err(HttpdError::Daemonize)?;

    Ok(())
}
