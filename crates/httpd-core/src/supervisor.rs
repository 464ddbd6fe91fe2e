//! The Supervisor: owns the Worker Record table, spawns and respawns
//! Workers, and orchestrates shutdown.

use crate::error::HttpdError;
use crate::logger::{self, Severity};
use crate::signal::{self, ShutdownSignal};
use crate::worker;
use nix::sys::signal::{kill, Signal};
use nix::sys::socket::{shutdown as socket_shutdown, Shutdown};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, ForkResult, Pid};
use std::os::fd::AsRawFd;
use std::time::Duration;

/// One Worker Record: a stable slot holding the live child pid, if
/// any. `None` means this slot's Worker has terminated and has not
/// yet been respawned.
struct Slot {
    pid: Option<Pid>,
}

/// Spawn `worker_count` Workers over the shared `listener`, then block
/// until a shutdown signal is observed, respawning any Worker that
/// crashes along the way.
pub fn run(
    mut listener: mio::net::TcpListener,
    worker_count: u32,
    shutdown: ShutdownSignal,
) -> Result<(), HttpdError> {
    let mut slots: Vec<Slot> = (0..worker_count).map(|_| Slot { pid: None }).collect();

    for index in 0..slots.len() {
        spawn_into(&mut slots, index, &mut listener)?;
    }

    while !shutdown.is_requested() {
        match waitpid(None, None) {
            Ok(WaitStatus::Exited(pid, code)) => {
                logger::log(
                    Severity::Info,
                    &format_args!("worker {pid} exited with status {code}"),
                );
                respawn(&mut slots, pid, &mut listener);
            }
            Ok(WaitStatus::Signaled(pid, sig, _)) => {
                logger::log(
                    Severity::Info,
                    &format_args!("worker {pid} terminated by signal {sig:?}"),
                );
                respawn(&mut slots, pid, &mut listener);
            }
            Ok(_) => {}
            Err(nix::errno::Errno::EINTR) => {
                // Either a child changed state (we'll see it on the
                // next call) or a shutdown signal interrupted us; the
                // loop condition re-checks `shutdown` either way.
            }
            Err(nix::errno::Errno::ECHILD) => {
                // Every slot is currently unoccupied (all respawns so
                // far have failed); nothing to wait for until either
                // a respawn succeeds or shutdown is requested.
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(e) => {
                logger::log(Severity::Warn, &format_args!("wait failed: {e}"));
            }
        }
    }

    half_close(&listener);
    terminate_workers(&slots);

    Ok(())
}

fn spawn_into(
    slots: &mut [Slot],
    index: usize,
    listener: &mut mio::net::TcpListener,
) -> Result<(), HttpdError> {
    // SAFETY: the supervisor is single-threaded at this point; the
    // child performs only the worker event loop and never returns to
    // supervisor code.
    match unsafe { fork() }.map_err(HttpdError::Spawn)? {
        ForkResult::Child => {
            // `ShutdownSignal::install` ran in the Supervisor before
            // any Worker existed; fork() inherits that disposition,
            // not just pending signals, and no consumer thread for it
            // survives the fork. Reset to default before doing
            // anything else so a Worker actually dies on SIGTERM
            // instead of silently catching it.
            if let Err(e) = signal::reset_to_default() {
                logger::log(
                    Severity::Error,
                    &format_args!("worker {index} failed to reset signal disposition: {e}"),
                );
                std::process::exit(1);
            }

            let outcome = worker::run(listener);
            match outcome {
                Ok(()) => std::process::exit(0),
                Err(err) => {
                    logger::log(
                        Severity::Error,
                        &format_args!("worker {index} failed: {err}"),
                    );
                    std::process::exit(1);
                }
            }
        }
        ForkResult::Parent { child } => {
            slots[index].pid = Some(child);
            logger::log(
                Severity::Notice,
                &format_args!("spawned worker {index} as pid {child}"),
            );
            Ok(())
        }
    }
}

fn respawn(slots: &mut [Slot], pid: Pid, listener: &mut mio::net::TcpListener) {
    let Some(index) = slots.iter().position(|slot| slot.pid == Some(pid)) else {
        return;
    };
    slots[index].pid = None;
    if let Err(err) = spawn_into(slots, index, listener) {
        logger::log(
            Severity::Error,
            &format_args!("failed to respawn slot {index}: {err}"),
        );
    }
}

/// Refuse new connections on the shared listener without actually
/// closing it out from under any Worker still holding its own copy of
/// the descriptor: `shutdown(2)` acts on the underlying socket itself,
/// visible to every duplicate.
fn half_close(listener: &mio::net::TcpListener) {
    if let Err(e) = socket_shutdown(listener.as_raw_fd(), Shutdown::Read) {
        logger::log(Severity::Warn, &format_args!("failed to half-close listener: {e}"));
    }
}

fn terminate_workers(slots: &[Slot]) {
    let live: Vec<Pid> = slots.iter().filter_map(|slot| slot.pid).collect();

    for pid in &live {
        if let Err(e) = kill(*pid, Signal::SIGTERM) {
            logger::log(Severity::Warn, &format_args!("failed to signal worker {pid}: {e}"));
        }
    }

    for _ in &live {
        if let Err(e) = waitpid(None, None) {
            logger::log(
                Severity::Warn,
                &format_args!("failed to reap a worker during shutdown: {e}"),
            );
        }
    }
}
