//! # httpd-core
//!
//! A minimal, hardened static-file HTTP/1.1 server for trusted,
//! root-hosted deployments.
//!
//! This crate provides the core mechanisms:
//! - Privilege descent: bind, chroot, drop group/user identity, listen
//! - A supervisor/worker prefork lifecycle over a shared listener and
//!   a shared epoll-based readiness multiplexer
//! - A minimal HTTP/1.1 request handler serving regular files from disk
//! - Canonical response framing and extension-based content typing
//! - Signal-driven, idempotent shutdown

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod daemonize;
pub mod error;
pub mod http;
pub mod listener;
pub mod logger;
pub mod multiplexer;
pub mod privilege;
pub mod signal;
pub mod supervisor;
pub mod worker;

pub use config::Config;
pub use error::{HttpdError, WorkerError};

/// Crate-level result type for startup-fatal paths.
pub type Result<T> = std::result::Result<T, HttpdError>;
