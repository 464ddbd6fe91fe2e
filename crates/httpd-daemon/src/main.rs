//! `httpd` - prefork static-file HTTP/1.1 server.
//!
//! Wires the privilege-descent pipeline, the readiness multiplexer,
//! the signal translator, and the Supervisor together in the order
//! mandated by the design: logging sink, detachment, bind, chroot,
//! privilege drop, listen, multiplexer setup, then worker spawn.

use httpd_core::logger::{self, Severity};
use httpd_core::{config::Config, daemonize, multiplexer, privilege, signal::ShutdownSignal};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logger::log(Severity::Error, &format_args!("{err}"));
            ExitCode::FAILURE
        }
    }
}

fn run() -> httpd_core::Result<()> {
    let config = Config::from_args()?;

    if config.foreground {
        logger::use_interactive();
    } else {
        logger::use_daemon();
    }

    if !config.foreground {
        daemonize::detach()?;
    }

    let tcp_listener = privilege::initialize(&config)?;
    let listener = multiplexer::prepare_listener(tcp_listener)?;

    let shutdown = ShutdownSignal::install()?;

    logger::log(
        Severity::Notice,
        &format_args!(
            "httpd listening on {}:{} with {} worker(s)",
            config.address, config.port, config.workers
        ),
    );

    httpd_core::supervisor::run(listener, config.workers, shutdown)?;

    logger::log(Severity::Notice, &format_args!("shutdown complete"));
    Ok(())
}
