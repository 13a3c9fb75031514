use crate::error::ControlRequest;
use crate::event_codes::EV_MAX;
use std::fs::File;
use std::io;
use std::mem;
use std::os::fd::{AsRawFd, BorrowedFd, RawFd};

// See `include/uapi/asm-generic/ioctl.h`.
const IOC_NRBITS: libc::c_ulong = 8;
const IOC_TYPEBITS: libc::c_ulong = 8;
const IOC_SIZEBITS: libc::c_ulong = 14;
const IOC_NRSHIFT: libc::c_ulong = 0;
const IOC_TYPESHIFT: libc::c_ulong = IOC_NRSHIFT + IOC_NRBITS;
const IOC_SIZESHIFT: libc::c_ulong = IOC_TYPESHIFT + IOC_TYPEBITS;
const IOC_DIRSHIFT: libc::c_ulong = IOC_SIZESHIFT + IOC_SIZEBITS;
const IOC_NRMASK: libc::c_ulong = (1 << IOC_NRBITS) - 1;
const IOC_WRITE: libc::c_ulong = 1;
const IOC_READ: libc::c_ulong = 2;

/// The `type` byte of every evdev ioctl.
const EVDEV_IOC_TYPE: libc::c_ulong = b'E' as libc::c_ulong;

/// `sizeof(struct input_id)`: four `__u16`s.
pub(crate) const INPUT_ID_LEN: usize = 4 * mem::size_of::<u16>();
/// `sizeof(struct input_absinfo)`: six `__s32`s.
pub(crate) const INPUT_ABSINFO_LEN: usize = 6 * mem::size_of::<i32>();
/// `sizeof(unsigned int[2])`, used by the keycode and repeat ioctls.
pub(crate) const UINT_PAIR_LEN: usize = 2 * mem::size_of::<libc::c_uint>();

const fn ioc(dir: libc::c_ulong, nr: libc::c_ulong, size: usize) -> libc::c_ulong {
    (dir << IOC_DIRSHIFT)
        | (EVDEV_IOC_TYPE << IOC_TYPESHIFT)
        | (nr << IOC_NRSHIFT)
        | ((size as libc::c_ulong) << IOC_SIZESHIFT)
}

const fn request(name: &'static str, code: libc::c_ulong) -> ControlRequest {
    ControlRequest { name, code }
}

pub(crate) const EVIOCGVERSION: ControlRequest = request(
    "EVIOCGVERSION",
    ioc(IOC_READ, 0x01, mem::size_of::<libc::c_int>()),
);
pub(crate) const EVIOCGID: ControlRequest =
    request("EVIOCGID", ioc(IOC_READ, 0x02, INPUT_ID_LEN));
pub(crate) const EVIOCGREP: ControlRequest =
    request("EVIOCGREP", ioc(IOC_READ, 0x03, UINT_PAIR_LEN));
pub(crate) const EVIOCSREP: ControlRequest =
    request("EVIOCSREP", ioc(IOC_WRITE, 0x03, UINT_PAIR_LEN));
pub(crate) const EVIOCGKEYCODE: ControlRequest =
    request("EVIOCGKEYCODE", ioc(IOC_READ, 0x04, UINT_PAIR_LEN));
pub(crate) const EVIOCSKEYCODE: ControlRequest =
    request("EVIOCSKEYCODE", ioc(IOC_WRITE, 0x04, UINT_PAIR_LEN));

pub(crate) fn eviocgname(len: usize) -> ControlRequest {
    request("EVIOCGNAME", ioc(IOC_READ, 0x06, len))
}

pub(crate) fn eviocgphys(len: usize) -> ControlRequest {
    request("EVIOCGPHYS", ioc(IOC_READ, 0x07, len))
}

pub(crate) fn eviocguniq(len: usize) -> ControlRequest {
    request("EVIOCGUNIQ", ioc(IOC_READ, 0x08, len))
}

pub(crate) fn eviocgkey(len: usize) -> ControlRequest {
    request("EVIOCGKEY", ioc(IOC_READ, 0x18, len))
}

pub(crate) fn eviocgled(len: usize) -> ControlRequest {
    request("EVIOCGLED", ioc(IOC_READ, 0x19, len))
}

pub(crate) fn eviocgsnd(len: usize) -> ControlRequest {
    request("EVIOCGSND", ioc(IOC_READ, 0x1a, len))
}

/// `EVIOCGBIT(ev, len)`. Event type 0 asks for the supported event types themselves.
///
/// Types past `EV_MAX` have no request: `0x20 + ev` would land on the `EVIOCGABS` numbers.
pub(crate) fn eviocgbit(event_type: u16, len: usize) -> Option<ControlRequest> {
    (event_type <= EV_MAX).then(|| {
        request(
            "EVIOCGBIT",
            ioc(IOC_READ, 0x20 + libc::c_ulong::from(event_type), len),
        )
    })
}

/// `EVIOCGABS(abs)`, or `None` when `0x40 + abs` doesn't fit in the request number.
///
/// Codes past `ABS_MAX` that still fit are passed through for the driver to reject.
pub(crate) fn eviocgabs(abs: u16) -> Option<ControlRequest> {
    let nr = 0x40 + libc::c_ulong::from(abs);

    (nr <= IOC_NRMASK).then(|| request("EVIOCGABS", ioc(IOC_READ, nr, INPUT_ABSINFO_LEN)))
}

/// An opened event device that control requests can be issued against.
///
/// Opening and closing the device is up to the caller; this crate only borrows the handle.
pub trait DeviceHandle {
    /// The file descriptor of the device, reported in errors.
    fn raw_fd(&self) -> RawFd;

    /// Issue `request`, with `arg` as the in/out argument buffer.
    ///
    /// `arg` must be at least as large as the size encoded in `request`.
    fn control(&self, request: &ControlRequest, arg: &mut [u8]) -> io::Result<()>;
}

/// Run `ioctl(2)` on `fd`, passing `arg` as the argument pointer.
fn ioctl(fd: RawFd, request: libc::c_ulong, arg: &mut [u8]) -> io::Result<()> {
    let res = unsafe { libc::ioctl(fd, request as _, arg.as_mut_ptr()) };

    if res < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

impl DeviceHandle for File {
    fn raw_fd(&self) -> RawFd {
        self.as_raw_fd()
    }

    fn control(&self, request: &ControlRequest, arg: &mut [u8]) -> io::Result<()> {
        ioctl(self.as_raw_fd(), request.code, arg)
    }
}

impl DeviceHandle for BorrowedFd<'_> {
    fn raw_fd(&self) -> RawFd {
        self.as_raw_fd()
    }

    fn control(&self, request: &ControlRequest, arg: &mut [u8]) -> io::Result<()> {
        ioctl(self.as_raw_fd(), request.code, arg)
    }
}

impl<T: DeviceHandle + ?Sized> DeviceHandle for &T {
    fn raw_fd(&self) -> RawFd {
        (**self).raw_fd()
    }

    fn control(&self, request: &ControlRequest, arg: &mut [u8]) -> io::Result<()> {
        (**self).control(request, arg)
    }
}
