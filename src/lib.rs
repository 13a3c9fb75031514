//! This crate queries, controls and streams events from Linux evdev input devices
//! (`/dev/input/event*`).
//!
//! An [`EventDevice`] wraps an already-opened device handle (any [`DeviceHandle`], e.g. a
//! [`File`](std::fs::File)) and exposes the device identity, its capability and state
//! bitmaps as lists of feature codes, absolute axis calibration, keycode remapping and the
//! autorepeat settings. Events are read and written as [`InputEventRecord`]s, encoded in the
//! kernel's native `struct input_event` layout.
//!
//! Every call blocks, and nothing is cached: each query issues one fresh ioctl.
//!
//! # Example
//!
//! Print the supported event types, then every event the device reports. Reading
//! `/dev/input/event*` usually requires root privileges.
//!
//! ```no_run
//! use std::fs::File;
//! use eventdevice::{EventDevice, EventDeviceError};
//!
//! fn main() -> Result<(), EventDeviceError> {
//!     let mut device = EventDevice::new(File::open("/dev/input/event3")?);
//!
//!     println!("{} ({})", device.device_name()?, device.interface_version()?);
//!     println!("types: {:?}", device.supported_feature_types()?);
//!
//!     loop {
//!         println!("{:?}", device.read_event()?);
//!     }
//! }
//! ```

#[cfg(not(target_os = "linux"))]
compile_error!("This crate only works on Linux");

pub mod bits;
mod device;
mod error;
pub mod event;
pub mod event_codes;
#[cfg(test)]
mod testing;

pub use device::{
    AxisInfo, DeviceHandle, DeviceIdentity, EventDevice, InterfaceVersion, RepeatRate,
};
pub use error::{map_control_error, ControlRequest, ErrorKind, EventDeviceError};
pub use event::{decode, encode, InputEventRecord, Timestamp, EVENT_RECORD_LEN};
pub use event_codes::*;

/// A feature code (or event type) within its namespace.
pub type FeatureCode = u16;

pub type EventDeviceResult<T> = Result<T, EventDeviceError>;
