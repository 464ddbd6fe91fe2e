//! Per-connection request handling: read, parse, resolve, respond.
//!
//! Reads yield back to the event loop on would-block (edge-triggered
//! registration resumes on the next readiness event); sends spin-retry
//! in place, trading worst-case latency on a slow client for not
//! needing a write-readiness re-registration dance. A true I/O failure
//! on send is fatal to the worker; every other condition here either
//! closes this connection alone or asks the caller to keep waiting.

use super::{content_type, request, resolve, response};
use crate::error::{RequestError, WorkerError};
use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsRawFd, BorrowedFd};
use std::path::Path;

/// Upper bound on a single request-head read.
pub const READ_BUFFER_LEN: usize = 32 * 1024;

/// What the caller should do with this connection after one servicing
/// attempt.
pub enum Outcome {
    /// The connection is done: close and deregister it.
    Close,
    /// Nothing was ready to read; leave it registered.
    Pending,
}

/// Service one readiness event on `stream`. `root` is the file-system
/// root requests are resolved against (the chroot root in production,
/// an arbitrary directory in tests).
pub fn service(
    stream: &mut mio::net::TcpStream,
    root: &Path,
) -> Result<Outcome, WorkerError> {
    let mut buf = [0u8; READ_BUFFER_LEN];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => return Ok(Outcome::Close),
            Ok(n) => {
                respond(stream, root, &buf[..n])?;
                return Ok(Outcome::Close);
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(Outcome::Pending),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            // Any other read failure closes this connection only; it
            // is not fatal to the worker.
            Err(_) => return Ok(Outcome::Close),
        }
    }
}

fn respond(stream: &mut mio::net::TcpStream, root: &Path, buf: &[u8]) -> Result<(), WorkerError> {
    let request = match request::parse(buf) {
        Ok(request) => request,
        Err(err) => return send_all(stream, &response::error(status_for(err))),
    };

    match resolve::resolve(root, &request.target) {
        Err(RequestError::IsDirectory { has_trailing_slash }) => {
            let location = if has_trailing_slash {
                format!("{}index.html", request.target)
            } else {
                format!("{}/", request.target)
            };
            send_all(stream, &response::redirect(&location))
        }
        Err(err) => send_all(stream, &response::error(status_for(err))),
        Ok(target) => {
            let file = match File::open(&target.path) {
                Ok(file) => file,
                Err(_) => {
                    return send_all(
                        stream,
                        &response::error(response::Status::InternalServerError),
                    )
                }
            };

            let content_type = content_type::lookup(&request.target);
            let head = response::file_head(content_type, target.len);
            send_all(stream, &head)?;
            send_file(stream, &file, target.len)
        }
    }
}

fn status_for(err: RequestError) -> response::Status {
    match err {
        RequestError::NotImplemented => response::Status::NotImplemented,
        RequestError::EmptyTarget | RequestError::Internal => {
            response::Status::InternalServerError
        }
        RequestError::NotFound => response::Status::NotFound,
        RequestError::IsDirectory { .. } => response::Status::MovedPermanently,
    }
}

/// Send every byte of `buf`, spin-retrying on would-block and
/// interruption. A short write that makes no progress at all (`Ok(0)`)
/// or any other I/O error is fatal to the worker.
fn send_all(stream: &mut mio::net::TcpStream, mut buf: &[u8]) -> Result<(), WorkerError> {
    while !buf.is_empty() {
        match stream.write(buf) {
            Ok(0) => {
                return Err(WorkerError::SendFailed(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "wrote zero bytes",
                )))
            }
            Ok(n) => buf = &buf[n..],
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => continue,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(WorkerError::SendFailed(e)),
        }
    }
    Ok(())
}

/// Stream `file`'s first `len` bytes to `stream` via `sendfile`,
/// falling back to a buffered copy loop if the kernel call itself is
/// unavailable (e.g. under a seccomp policy that denies it).
fn send_file(stream: &mut mio::net::TcpStream, file: &File, len: u64) -> Result<(), WorkerError> {
    let mut offset: i64 = 0;
    let mut remaining = len;

    loop {
        if remaining == 0 {
            return Ok(());
        }

        // SAFETY: both descriptors outlive this call; neither is
        // consumed or closed by sendfile.
        let out_fd = unsafe { BorrowedFd::borrow_raw(stream.as_raw_fd()) };
        let in_fd = unsafe { BorrowedFd::borrow_raw(file.as_raw_fd()) };

        match nix::sys::sendfile::sendfile(out_fd, in_fd, Some(&mut offset), remaining as usize) {
            Ok(0) => return Ok(()), // file shorter than the stated length
            Ok(n) => remaining -= n as u64,
            Err(nix::errno::Errno::EAGAIN | nix::errno::Errno::EINTR) => continue,
            Err(_) => return send_file_buffered(stream, file, offset as u64, remaining),
        }
    }
}

fn send_file_buffered(
    stream: &mut mio::net::TcpStream,
    file: &File,
    mut offset: u64,
    mut remaining: u64,
) -> Result<(), WorkerError> {
    use std::os::unix::fs::FileExt;

    let mut buf = [0u8; 64 * 1024];

    while remaining > 0 {
        let chunk = remaining.min(buf.len() as u64) as usize;
        let n = file
            .read_at(&mut buf[..chunk], offset)
            .map_err(WorkerError::SendFailed)?;
        if n == 0 {
            return Ok(());
        }
        send_all(stream, &buf[..n])?;
        offset += n as u64;
        remaining -= n as u64;
    }
    Ok(())
}
