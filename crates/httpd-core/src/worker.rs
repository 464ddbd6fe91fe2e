//! The Worker event loop.
//!
//! A Worker never returns control to the Supervisor: [`run`] loops
//! until an unrecoverable error. Its caller (the forked child's entry
//! point, in [`crate::supervisor`]) treats any `Err` as fatal to this
//! process and exits non-zero so the Supervisor respawns the slot.
//! Workers install no signal handlers of their own:
//! [`crate::signal::reset_to_default`] restores the default
//! disposition for `SIGTERM`/`SIGINT`/`SIGQUIT` immediately after
//! `fork()`, so each Worker terminates promptly on a shutdown signal,
//! with no graceful drain of in-flight connections.
//!
//! ## One multiplexer per Worker
//!
//! The Listener descriptor is shared with the Supervisor and every
//! sibling Worker by descriptor-table inheritance at fork time, but
//! the readiness multiplexer is not: [`run`] creates its own
//! `mio::Poll` right after fork and registers only the shared Listener
//! into it (see [`crate::multiplexer`]). Because each Worker owns a
//! distinct kernel epoll instance, a ready event observed here was
//! always meant for this Worker — there is no cross-worker token
//! bookkeeping to do, and no event a sibling's multiplexer could ever
//! swallow on this Worker's behalf.

use crate::error::WorkerError;
use crate::http;
use crate::multiplexer::LISTENER;
use mio::{Events, Interest, Poll, Token};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

const EVENTS_CAPACITY: usize = 16;

/// Run the event loop against the shared `listener`, inherited from
/// the Supervisor by descriptor-table duplication at fork. Builds and
/// owns this Worker's readiness multiplexer.
pub fn run(listener: &mut mio::net::TcpListener) -> Result<(), WorkerError> {
    let mut poll = Poll::new().map_err(WorkerError::PollFailed)?;
    poll.registry()
        .register(listener, LISTENER, Interest::READABLE)
        .map_err(WorkerError::RegisterFailed)?;

    let mut events = Events::with_capacity(EVENTS_CAPACITY);
    let mut connections: HashMap<Token, mio::net::TcpStream> = HashMap::new();
    let mut next_token: usize = 1;

    loop {
        if let Err(e) = poll.poll(&mut events, None) {
            if e.kind() == ErrorKind::Interrupted {
                continue;
            }
            return Err(WorkerError::PollFailed(e));
        }

        for event in events.iter() {
            let token = event.token();

            if token == LISTENER {
                accept_all(listener, &poll, &mut connections, &mut next_token)?;
                continue;
            }

            let Some(stream) = connections.get_mut(&token) else {
                continue;
            };

            match http::service(stream, Path::new("/")) {
                Ok(http::Outcome::Pending) => {}
                Ok(http::Outcome::Close) => {
                    if let Some(mut stream) = connections.remove(&token) {
                        let _ = poll.registry().deregister(&mut stream);
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Accept every pending connection on `listener` until the accept
/// would block — the thundering-herd "graceful loser" discipline: a
/// sibling Worker may win every accept in the batch, and that is not
/// an error.
fn accept_all(
    listener: &mio::net::TcpListener,
    poll: &Poll,
    connections: &mut HashMap<Token, mio::net::TcpStream>,
    next_token: &mut usize,
) -> Result<(), WorkerError> {
    loop {
        match listener.accept() {
            Ok((mut stream, _addr)) => {
                let token = Token(*next_token);
                *next_token += 1;
                poll.registry()
                    .register(&mut stream, token, Interest::READABLE)
                    .map_err(WorkerError::RegisterFailed)?;
                connections.insert(token, stream);
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(()),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) => return Ok(()),
        }
    }
}
