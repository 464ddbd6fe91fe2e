//! Error types for httpd-core

use thiserror::Error;

/// Startup-fatal errors. Any of these aborts the process before the
/// service opens; the caller logs via [`crate::logger`] and exits 1.
#[derive(Error, Debug)]
pub enum HttpdError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to daemonize: {0}")]
    Daemonize(#[source] nix::Error),

    #[error("failed to bind {addr}:{port}: {source}")]
    Bind {
        addr: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("chroot to '{path}' failed: {source}")]
    Chroot {
        path: String,
        #[source]
        source: nix::Error,
    },

    #[error("privilege drop failed: {0}")]
    PrivilegeDrop(#[source] nix::Error),

    #[error("listen failed: {0}")]
    Listen(#[source] std::io::Error),

    #[error("failed to create readiness multiplexer: {0}")]
    Multiplexer(#[source] std::io::Error),

    #[error("failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),

    #[error("failed to spawn worker: {0}")]
    Spawn(#[source] nix::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can terminate a single Worker process. These never
/// propagate beyond the worker that raised them; the Supervisor
/// observes only the worker's exit status and respawns.
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("readiness wait failed: {0}")]
    PollFailed(#[source] std::io::Error),

    #[error("failed to register accepted connection: {0}")]
    RegisterFailed(#[source] std::io::Error),

    #[error("unrecoverable send failure on connection: {0}")]
    SendFailed(#[source] std::io::Error),
}

/// Per-request errors. Each variant maps to a specific HTTP status
/// surfaced to the client; the connection is always closed afterward.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    #[error("method/protocol not recognized")]
    NotImplemented,
    #[error("empty request target")]
    EmptyTarget,
    #[error("target does not exist")]
    NotFound,
    #[error("target is a directory")]
    IsDirectory { has_trailing_slash: bool },
    #[error("internal error resolving target")]
    Internal,
}
