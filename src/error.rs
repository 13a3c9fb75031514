use std::fmt;
use std::io;
use std::os::fd::RawFd;
use thiserror::Error;

/// A named evdev control request, kept around for error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlRequest {
    /// The name of the ioctl (e.g. `EVIOCGID`).
    pub name: &'static str,
    /// The encoded request number passed to `ioctl(2)`.
    pub code: libc::c_ulong,
}

impl fmt::Display for ControlRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#x})", self.name, self.code)
    }
}

/// The broad category of an [`EventDeviceError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidHandle,
    InternalFault,
    UnsupportedRequest,
    WrongDeviceOrRequest,
    UnknownControlFailure,
    Format,
    FeatureUnavailable,
    NoActivationState,
    InvalidTimestamp,
    Io,
}

#[derive(Error, Debug)]
pub enum EventDeviceError {
    #[error("file descriptor {fd} is invalid (request {request}, errno EBADF {errno})")]
    InvalidHandle {
        fd: RawFd,
        request: ControlRequest,
        errno: i32,
    },
    #[error("request {request} was passed an invalid memory location (errno EFAULT {errno})")]
    InternalFault {
        fd: RawFd,
        request: ControlRequest,
        errno: i32,
    },
    #[error("invalid request {request} or arguments (errno EINVAL {errno})")]
    UnsupportedRequest {
        fd: RawFd,
        request: ControlRequest,
        errno: i32,
    },
    #[error(
        "either fd {fd} is not an event device or request {request} is not valid for this kind \
         of device (errno ENOTTY {errno})"
    )]
    WrongDeviceOrRequest {
        fd: RawFd,
        request: ControlRequest,
        errno: i32,
    },
    #[error("request {request} failed on fd {fd} with unknown errno {errno}")]
    UnknownControlFailure {
        fd: RawFd,
        request: ControlRequest,
        errno: i32,
    },
    #[error("malformed event record: {0}")]
    Format(String),
    #[error("{0} is not supported by this build")]
    FeatureUnavailable(&'static str),
    #[error("no activation state for event type {0:#x}")]
    NoActivationState(u16),
    #[error("invalid timestamp: {0}s {1}us")]
    InvalidTimestamp(i64, i64),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl EventDeviceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidHandle { .. } => ErrorKind::InvalidHandle,
            Self::InternalFault { .. } => ErrorKind::InternalFault,
            Self::UnsupportedRequest { .. } => ErrorKind::UnsupportedRequest,
            Self::WrongDeviceOrRequest { .. } => ErrorKind::WrongDeviceOrRequest,
            Self::UnknownControlFailure { .. } => ErrorKind::UnknownControlFailure,
            Self::Format(_) => ErrorKind::Format,
            Self::FeatureUnavailable(_) => ErrorKind::FeatureUnavailable,
            Self::NoActivationState(_) => ErrorKind::NoActivationState,
            Self::InvalidTimestamp(..) => ErrorKind::InvalidTimestamp,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// The errno reported by the failed control call, if this is a control error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::InvalidHandle { errno, .. }
            | Self::InternalFault { errno, .. }
            | Self::UnsupportedRequest { errno, .. }
            | Self::WrongDeviceOrRequest { errno, .. }
            | Self::UnknownControlFailure { errno, .. } => Some(*errno),
            _ => None,
        }
    }

    /// The control request that failed, if this is a control error.
    pub fn request(&self) -> Option<ControlRequest> {
        match self {
            Self::InvalidHandle { request, .. }
            | Self::InternalFault { request, .. }
            | Self::UnsupportedRequest { request, .. }
            | Self::WrongDeviceOrRequest { request, .. }
            | Self::UnknownControlFailure { request, .. } => Some(*request),
            _ => None,
        }
    }
}

/// Translate the errno of a failed control call into an [`EventDeviceError`].
pub fn map_control_error(errno: i32, request: ControlRequest, fd: RawFd) -> EventDeviceError {
    match errno {
        libc::EBADF => EventDeviceError::InvalidHandle { fd, request, errno },
        libc::EFAULT => EventDeviceError::InternalFault { fd, request, errno },
        libc::EINVAL => EventDeviceError::UnsupportedRequest { fd, request, errno },
        libc::ENOTTY => EventDeviceError::WrongDeviceOrRequest { fd, request, errno },
        _ => EventDeviceError::UnknownControlFailure { fd, request, errno },
    }
}
