//! The privilege-descent pipeline.
//!
//! Performed, in order, by [`initialize`]: bind → chroot → drop gid →
//! drop uid → listen → multiplexer setup. See §4.1 of the design
//! document for the rationale behind each ordering constraint; do not
//! reorder these steps.

use crate::config::Config;
use crate::error::HttpdError;
use crate::{listener, logger};
use nix::unistd::{self, Gid, Uid};
use std::net::TcpListener;
use std::path::Path;

/// Confine the process to `root` and change the working directory to
/// `/`. A missing `root` is a warning, not an error — the server then
/// runs unconfined.
///
/// Must run after [`listener::bind`] (so a non-chrooted configuration
/// path remains resolvable while binding) and before [`drop_privileges`]
/// (the confined identity must not be the one performing confinement).
pub fn chroot(root: Option<&Path>) -> Result<(), HttpdError> {
    let Some(root) = root else {
        logger::log(
            logger::Severity::Warn,
            &format_args!("chroot directory is not specified"),
        );
        return Ok(());
    };

    unistd::chroot(root).map_err(|source| HttpdError::Chroot {
        path: root.display().to_string(),
        source,
    })?;

    unistd::chdir("/").map_err(|source| HttpdError::Chroot {
        path: "/".into(),
        source,
    })?;

    Ok(())
}

/// Drop group and user identity, in that order. A missing id is a
/// warning, not an error. Group must be dropped before user: dropping
/// uid first would remove the capability to change gid.
pub fn drop_privileges(uid: Option<u32>, gid: Option<u32>) -> Result<(), HttpdError> {
    match gid {
        Some(gid) => {
            let gid = Gid::from_raw(gid);
            unistd::setresgid(gid, gid, gid).map_err(HttpdError::PrivilegeDrop)?;
        }
        None => logger::log(
            logger::Severity::Warn,
            &format_args!("gid to drop to is not specified"),
        ),
    }

    match uid {
        Some(uid) => {
            let uid = Uid::from_raw(uid);
            unistd::setresuid(uid, uid, uid).map_err(HttpdError::PrivilegeDrop)?;
        }
        None => logger::log(
            logger::Severity::Warn,
            &format_args!("uid to drop to is not specified"),
        ),
    }

    Ok(())
}

/// Run the full descent: bind, chroot, drop privileges, listen. Does
/// not set up the readiness multiplexer — the caller does that last,
/// once the listener is in the LISTEN state, mirroring §4.1 step 7.
pub fn initialize(config: &Config) -> Result<TcpListener, HttpdError> {
    let tcp_listener = listener::bind(config.address, config.port)?;

    chroot(config.rootdir.as_deref())?;
    drop_privileges(config.uid, config.gid)?;

    listener::listen(&tcp_listener, config.backlog)?;

    Ok(tcp_listener)
}
