//! CLI flags and the validated, immutable server configuration

use crate::error::HttpdError;
use clap::Parser;
use std::net::Ipv4Addr;
use std::path::PathBuf;

/// A minimal, hardened static-file HTTP server.
#[derive(Parser, Debug)]
#[command(name = "httpd", about = "Prefork static-file HTTP/1.1 server", version)]
struct Cli {
    /// Run in foreground (skip daemonization; log to stderr)
    #[arg(short = 'f')]
    foreground: bool,

    /// Path to the directory the process chroots into before serving
    #[arg(short = 'r', value_name = "path")]
    rootdir: Option<PathBuf>,

    /// uid to drop to after binding and chrooting
    #[arg(short = 'u', value_name = "uid")]
    uid: Option<u32>,

    /// gid to drop to after binding and chrooting
    #[arg(short = 'g', value_name = "gid")]
    gid: Option<u32>,

    /// Listen address, dotted-quad IPv4
    #[arg(short = 'l', value_name = "addr")]
    address: Ipv4Addr,

    /// Listen port
    #[arg(short = 'p', value_name = "port", default_value_t = 8080)]
    port: u16,

    /// Number of worker processes
    #[arg(short = 'w', value_name = "n", default_value_t = 1)]
    workers: u32,

    /// Listen backlog
    #[arg(short = 'b', value_name = "n", default_value_t = 4096)]
    backlog: u32,
}

/// Immutable, validated server configuration built once at startup and
/// shared (by value, then by reference) across the privilege-descent
/// pipeline, the Supervisor, and every forked Worker.
#[derive(Debug, Clone)]
pub struct Config {
    pub rootdir: Option<PathBuf>,
    pub address: Ipv4Addr,
    pub port: u16,
    pub workers: u32,
    pub backlog: u32,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub foreground: bool,
}

impl Config {
    /// Parse `argv`, validate, and build a [`Config`].
    ///
    /// Unknown flags and positional arguments are `clap` usage errors;
    /// like our own range validation, they print a message to stderr
    /// and the caller translates the `Err` into exit code 1 (clap's
    /// own exit-2 convention is not used here — see `DESIGN.md`).
    pub fn from_args() -> std::result::Result<Self, HttpdError> {
        let cli = Cli::try_parse_from(std::env::args_os()).map_err(|e| {
            let _ = e.print();
            HttpdError::Config("invalid command line".into())
        })?;
        Self::from_cli(cli)
    }

    fn from_cli(cli: Cli) -> std::result::Result<Self, HttpdError> {
        if cli.port == 0 {
            return Err(HttpdError::Config("port must be in 1..=65535".into()));
        }
        if cli.workers == 0 {
            return Err(HttpdError::Config("worker count must be >= 1".into()));
        }
        if cli.backlog == 0 {
            return Err(HttpdError::Config("backlog must be >= 1".into()));
        }

        Ok(Self {
            rootdir: cli.rootdir,
            address: cli.address,
            port: cli.port,
            workers: cli.workers,
            backlog: cli.backlog,
            uid: cli.uid,
            gid: cli.gid,
            foreground: cli.foreground,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> std::result::Result<Config, HttpdError> {
        let cli = Cli::try_parse_from(args).expect("clap parse");
        Config::from_cli(cli)
    }

    #[test]
    fn defaults_apply() {
        let cfg = parse(&["httpd", "-l", "127.0.0.1"]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.workers, 1);
        assert_eq!(cfg.backlog, 4096);
        assert!(!cfg.foreground);
        assert!(cfg.rootdir.is_none());
    }

    #[test]
    fn rejects_zero_workers() {
        let err = parse(&["httpd", "-l", "127.0.0.1", "-w", "0"]).unwrap_err();
        assert!(matches!(err, HttpdError::Config(_)));
    }

    #[test]
    fn rejects_zero_backlog() {
        let err = parse(&["httpd", "-l", "127.0.0.1", "-b", "0"]).unwrap_err();
        assert!(matches!(err, HttpdError::Config(_)));
    }

    #[test]
    fn full_flag_set() {
        let cfg = parse(&[
            "httpd", "-f", "-r", "/srv", "-u", "100", "-g", "100", "-l", "0.0.0.0", "-p", "9090",
            "-w", "4", "-b", "128",
        ])
        .unwrap();
        assert!(cfg.foreground);
        assert_eq!(cfg.rootdir, Some(PathBuf::from("/srv")));
        assert_eq!(cfg.uid, Some(100));
        assert_eq!(cfg.gid, Some(100));
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.workers, 4);
        assert_eq!(cfg.backlog, 128);
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["httpd", "-l", "127.0.0.1", "--bogus"]).is_err());
    }

    #[test]
    fn rejects_positional_argument() {
        assert!(Cli::try_parse_from(["httpd", "-l", "127.0.0.1", "extra"]).is_err());
    }
}
