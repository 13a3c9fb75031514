//! A scripted [`DeviceHandle`] for unit tests.

use crate::device::DeviceHandle;
use crate::error::ControlRequest;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};
use std::os::fd::RawFd;

pub(crate) const FAKE_FD: RawFd = 42;

/// Replies to control requests from a table keyed by request number. Requests missing
/// from the table fail with `ENOTTY`, like a driver that doesn't know them.
#[derive(Default)]
pub(crate) struct FakeHandle {
    replies: HashMap<libc::c_ulong, Result<Vec<u8>, i32>>,
    issued: RefCell<Vec<ControlRequest>>,
    /// The argument buffers of every request, as passed in.
    sent: RefCell<Vec<Vec<u8>>>,
    input: Cursor<Vec<u8>>,
    pub(crate) written: Vec<u8>,
    /// Accept at most this many bytes per `write` call.
    pub(crate) write_limit: Option<usize>,
}

impl FakeHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(mut self, request: ControlRequest, bytes: impl Into<Vec<u8>>) -> Self {
        self.replies.insert(request.code, Ok(bytes.into()));
        self
    }

    pub(crate) fn fail(mut self, request: ControlRequest, errno: i32) -> Self {
        self.replies.insert(request.code, Err(errno));
        self
    }

    pub(crate) fn with_input(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.input = Cursor::new(bytes.into());
        self
    }

    /// The names of the requests issued so far, in order.
    pub(crate) fn issued(&self) -> Vec<&'static str> {
        self.issued.borrow().iter().map(|r| r.name).collect()
    }

    pub(crate) fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.borrow().clone()
    }
}

impl DeviceHandle for FakeHandle {
    fn raw_fd(&self) -> RawFd {
        FAKE_FD
    }

    fn control(&self, request: &ControlRequest, arg: &mut [u8]) -> io::Result<()> {
        self.issued.borrow_mut().push(*request);
        self.sent.borrow_mut().push(arg.to_vec());

        match self.replies.get(&request.code) {
            Some(Ok(bytes)) => {
                let n = bytes.len().min(arg.len());
                arg[..n].copy_from_slice(&bytes[..n]);
                Ok(())
            }
            Some(Err(errno)) => Err(io::Error::from_raw_os_error(*errno)),
            None => Err(io::Error::from_raw_os_error(libc::ENOTTY)),
        }
    }
}

impl Read for FakeHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for FakeHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.write_limit.map_or(buf.len(), |limit| limit.min(buf.len()));
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Encode `values` as consecutive native-endian `u16`s.
pub(crate) fn u16s(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

/// Encode `values` as consecutive native-endian `i32`s.
pub(crate) fn i32s(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

/// Encode `values` as consecutive native-endian `u32`s.
pub(crate) fn u32s(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}
