//! Listener preparation for the readiness multiplexer.
//!
//! The Listener is made non-blocking and wrapped for `mio` exactly
//! once, by the Supervisor, before any Worker is spawned — but the
//! multiplexer itself is deliberately **not** created here. Each
//! Worker builds its own `mio::Poll` (its own kernel epoll instance)
//! immediately after `fork()` and registers the shared Listener into
//! that instance alone (see [`crate::worker`]). Two independent epoll
//! instances watching the same listening socket is the ordinary
//! multi-worker accept pattern; it is what keeps a ready event
//! addressed to the Worker that registered it rather than whichever
//! Worker the kernel happens to wake.
//!
//! `O_NONBLOCK` is a property of the underlying open file description,
//! not of any one process's descriptor-table entry, so setting it once
//! here is still in effect in every Worker after `fork()` duplicates
//! the descriptor table.

use crate::error::HttpdError;
use mio::Token;
use std::net::TcpListener as StdTcpListener;

/// Token identifying the shared listener in every Worker's event
/// loop.
pub const LISTENER: Token = Token(0);

/// Set the bound listener non-blocking and wrap it for `mio`.
pub fn prepare_listener(listener: StdTcpListener) -> Result<mio::net::TcpListener, HttpdError> {
    listener
        .set_nonblocking(true)
        .map_err(HttpdError::Multiplexer)?;
    Ok(mio::net::TcpListener::from_std(listener))
}
