//! Listener socket construction.
//!
//! Binding happens before chroot (so the configured address is bound
//! while the unconfined filesystem view is still visible) and before
//! privilege drop; `listen(2)` is deferred until after privilege drop
//! so the service window only opens under the reduced identity (see
//! [`crate::privilege`]).

use crate::error::HttpdError;
use socket2::{Domain, Protocol, SockRef, Socket, Type};
use std::net::{Ipv4Addr, SocketAddrV4, TcpListener};

/// Create, configure, and bind an IPv4 stream socket.
///
/// Sets `SO_REUSEADDR`, binds to `(address, port)`, but does **not**
/// transition to LISTEN — call [`listen`] after privilege descent
/// completes.
pub fn bind(address: Ipv4Addr, port: u16) -> Result<TcpListener, HttpdError> {
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP)).map_err(|source| {
        HttpdError::Bind {
            addr: address.to_string(),
            port,
            source,
        }
    })?;

    socket
        .set_reuse_address(true)
        .map_err(|source| HttpdError::Bind {
            addr: address.to_string(),
            port,
            source,
        })?;

    let sockaddr = SocketAddrV4::new(address, port);
    socket
        .bind(&sockaddr.into())
        .map_err(|source| HttpdError::Bind {
            addr: address.to_string(),
            port,
            source,
        })?;

    Ok(socket.into())
}

/// Transition the bound listener into the LISTEN state with the
/// configured backlog. Deferred until after privilege drop (see
/// [`crate::privilege::initialize`]).
pub fn listen(listener: &TcpListener, backlog: u32) -> Result<(), HttpdError> {
    SockRef::from(listener)
        .listen(backlog.try_into().unwrap_or(i32::MAX))
        .map_err(HttpdError::Listen)
}
