mod ioctl;

use crate::bits::Bitmap;
use crate::error::{map_control_error, ControlRequest, EventDeviceError};
use crate::event::{self, InputEventRecord, EVENT_RECORD_LEN};
use crate::event_codes::{EV_KEY, EV_LED, EV_MAX, EV_SND, KEY_MAX};
use crate::{EventDeviceResult, FeatureCode};
use std::fmt;
use std::io::{Read, Write};

pub use ioctl::DeviceHandle;
use ioctl::{INPUT_ABSINFO_LEN, INPUT_ID_LEN, UINT_PAIR_LEN};

/// The buffer size for the name, topology and unique id strings.
const DEVICE_STRING_MAX_LEN: usize = 256;

const REPEAT_RATE_SUPPORTED: bool = cfg!(feature = "repeat-rate");

/// The identity of an input device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeviceIdentity {
    /// The bus the device is connected through (`BUS_USB`, `BUS_I8042`, ...).
    pub bus_type: u16,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
    /// The version of the evdev interface the driver speaks.
    pub interface_version: InterfaceVersion,
}

/// The evdev interface version, packed by the kernel as `0xMMmmpp`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterfaceVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl InterfaceVersion {
    pub fn from_raw(raw: u32) -> Self {
        Self {
            major: (raw >> 16) as u8,
            minor: (raw >> 8) as u8,
            patch: raw as u8,
        }
    }
}

impl fmt::Display for InterfaceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Calibration of an absolute axis (`struct input_absinfo`).
///
/// Axes the device doesn't have are usually reported with every field set to 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AxisInfo {
    /// The current value of the axis.
    pub value: i32,
    pub minimum: i32,
    pub maximum: i32,
    /// Noise the driver filters out of reported values.
    pub fuzz: i32,
    /// Values within this distance of the center are reported as the center.
    pub flat: i32,
}

/// Key autorepeat settings, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RepeatRate {
    /// How long a key must be held before it starts repeating.
    pub initial_delay: u32,
    /// The time between two repeated key events.
    pub repeat_interval: u32,
}

/// An opened evdev input device (e.g. `/dev/input/event3`).
///
/// Every query issues a fresh control call: nothing is cached between calls. Reading events
/// blocks until the device reports a change.
#[derive(Debug)]
pub struct EventDevice<H> {
    handle: H,
}

impl<H> EventDevice<H> {
    pub fn new(handle: H) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn into_inner(self) -> H {
        self.handle
    }
}

impl<H: DeviceHandle> EventDevice<H> {
    /// Issue `request` and map any failure to an [`EventDeviceError`].
    fn control(&self, request: ControlRequest, arg: &mut [u8]) -> EventDeviceResult<()> {
        let fd = self.handle.raw_fd();

        log::trace!("fd {fd}: {request}");

        self.handle.control(&request, arg).map_err(|e| {
            log::debug!("fd {fd}: {request} failed: {e}");

            // Only a custom handle can fail without an errno
            map_control_error(e.raw_os_error().unwrap_or(0), request, fd)
        })
    }

    /// Read `struct input_id` using the `EVIOCGID` ioctl.
    fn input_id(&self) -> EventDeviceResult<[u16; 4]> {
        let mut buf = [0u8; INPUT_ID_LEN];

        self.control(ioctl::EVIOCGID, &mut buf)?;

        let mut id = [0u16; 4];
        for (field, bytes) in id.iter_mut().zip(buf.chunks_exact(2)) {
            *field = u16::from_ne_bytes([bytes[0], bytes[1]]);
        }

        Ok(id)
    }

    pub fn bus_type(&self) -> EventDeviceResult<u16> {
        Ok(self.input_id()?[0])
    }

    pub fn vendor(&self) -> EventDeviceResult<u16> {
        Ok(self.input_id()?[1])
    }

    pub fn product(&self) -> EventDeviceResult<u16> {
        Ok(self.input_id()?[2])
    }

    pub fn version(&self) -> EventDeviceResult<u16> {
        Ok(self.input_id()?[3])
    }

    /// Fetch the bus, vendor, product and version along with the interface version.
    pub fn identity(&self) -> EventDeviceResult<DeviceIdentity> {
        let [bus_type, vendor, product, version] = self.input_id()?;

        Ok(DeviceIdentity {
            bus_type,
            vendor,
            product,
            version,
            interface_version: self.interface_version()?,
        })
    }

    /// Read the evdev interface version using the `EVIOCGVERSION` ioctl.
    pub fn interface_version(&self) -> EventDeviceResult<InterfaceVersion> {
        let mut buf = [0u8; 4];

        self.control(ioctl::EVIOCGVERSION, &mut buf)?;

        Ok(InterfaceVersion::from_raw(u32::from_ne_bytes(buf)))
    }

    fn fetch_string(&self, request: fn(usize) -> ControlRequest) -> EventDeviceResult<String> {
        let mut buf = [0u8; DEVICE_STRING_MAX_LEN];

        self.control(request(buf.len()), &mut buf)?;

        let len = buf.iter().position(|b| *b == 0).unwrap_or(buf.len());

        Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
    }

    /// Read the human-readable name of the device.
    pub fn device_name(&self) -> EventDeviceResult<String> {
        self.fetch_string(ioctl::eviocgname)
    }

    /// Read the place of the device in the system topology, e.g.
    /// `usb-0000:00:1d.7-1.2.1/input0`.
    ///
    /// Devices without a physical location (virtual devices, for instance) fail with
    /// [`EventDeviceError::WrongDeviceOrRequest`].
    pub fn topology(&self) -> EventDeviceResult<String> {
        self.fetch_string(ioctl::eviocgphys)
    }

    /// Read the unique identifier of the device (usually the USB serial number).
    ///
    /// Most devices report the empty string.
    pub fn unique_id(&self) -> EventDeviceResult<String> {
        self.fetch_string(ioctl::eviocguniq)
    }

    /// Fill a bitmap for the codes in `[0, max_code)` and return the set ones.
    ///
    /// When `request` has nothing to issue, no code is set.
    fn fetch_codes<R: Into<Option<ControlRequest>>>(
        &self,
        request: impl FnOnce(usize) -> R,
        max_code: u16,
    ) -> EventDeviceResult<Vec<FeatureCode>> {
        let mut bitmap = Bitmap::for_codes(max_code);
        let buf = bitmap.as_bytes_mut();

        let request: Option<ControlRequest> = request(buf.len()).into();
        let Some(request) = request else {
            log::debug!("fd {}: no request to issue", self.handle.raw_fd());
            return Ok(Vec::new());
        };

        self.control(request, buf)?;

        Ok(bitmap.scan(max_code))
    }

    /// The event types (`EV_KEY`, `EV_LED`, ...) the device supports.
    pub fn supported_feature_types(&self) -> EventDeviceResult<Vec<FeatureCode>> {
        self.fetch_codes(|len| ioctl::eviocgbit(0, len), EV_MAX)
    }

    pub fn supports_feature_type(&self, event_type: u16) -> EventDeviceResult<bool> {
        Ok(self.supported_feature_types()?.contains(&event_type))
    }

    /// The codes of `event_type` the device supports.
    ///
    /// Asking for a type the device doesn't support usually returns an empty list. Types
    /// past `EV_MAX` always do, without a call to the device.
    pub fn supported_features_for_type(
        &self,
        event_type: u16,
    ) -> EventDeviceResult<Vec<FeatureCode>> {
        self.fetch_codes(|len| ioctl::eviocgbit(event_type, len), KEY_MAX)
    }

    /// The keys that are currently pressed.
    pub fn activated_keys(&self) -> EventDeviceResult<Vec<FeatureCode>> {
        self.fetch_codes(ioctl::eviocgkey, KEY_MAX)
    }

    /// The LEDs that are currently lit.
    pub fn activated_leds(&self) -> EventDeviceResult<Vec<FeatureCode>> {
        self.fetch_codes(ioctl::eviocgled, KEY_MAX)
    }

    /// The sounds that are currently playing.
    pub fn activated_sounds(&self) -> EventDeviceResult<Vec<FeatureCode>> {
        self.fetch_codes(ioctl::eviocgsnd, KEY_MAX)
    }

    /// The active codes of `event_type`. Only `EV_KEY`, `EV_LED` and `EV_SND` have state.
    pub fn activated_features_for_type(
        &self,
        event_type: u16,
    ) -> EventDeviceResult<Vec<FeatureCode>> {
        match event_type {
            EV_KEY => self.activated_keys(),
            EV_LED => self.activated_leds(),
            EV_SND => self.activated_sounds(),
            other => Err(EventDeviceError::NoActivationState(other)),
        }
    }

    pub fn is_activated(&self, event_type: u16, code: FeatureCode) -> EventDeviceResult<bool> {
        Ok(self.activated_features_for_type(event_type)?.contains(&code))
    }

    /// Read the calibration of absolute axis `code` using the `EVIOCGABS` ioctl.
    ///
    /// The kernel reports zeros for axes the device doesn't have. Codes past `ABS_MAX` are
    /// rejected with [`EventDeviceError::UnsupportedRequest`].
    pub fn axis_parameters(&self, code: FeatureCode) -> EventDeviceResult<AxisInfo> {
        let mut buf = [0u8; INPUT_ABSINFO_LEN];

        let Some(request) = ioctl::eviocgabs(code) else {
            let fd = self.handle.raw_fd();
            log::debug!("fd {fd}: axis {code:#x} has no EVIOCGABS request");

            // Never issued, so there is no request number to report
            let request = ControlRequest {
                name: "EVIOCGABS",
                code: 0,
            };
            return Err(map_control_error(libc::EINVAL, request, fd));
        };

        self.control(request, &mut buf)?;

        let field = |i: usize| {
            let mut v = [0u8; 4];
            v.copy_from_slice(&buf[i * 4..i * 4 + 4]);
            i32::from_ne_bytes(v)
        };

        // The sixth field (resolution) isn't exposed
        Ok(AxisInfo {
            value: field(0),
            minimum: field(1),
            maximum: field(2),
            fuzz: field(3),
            flat: field(4),
        })
    }

    /// The scancode currently mapped to `keycode`.
    ///
    /// Many drivers (USB keyboards in particular) don't support keycode remapping.
    pub fn scancode_for(&self, keycode: u32) -> EventDeviceResult<u32> {
        let mut buf = uint_pair(keycode, 0);

        self.control(ioctl::EVIOCGKEYCODE, &mut buf)?;

        Ok(split_uint_pair(&buf).1)
    }

    /// Map `keycode` to `scancode`.
    pub fn set_scancode_for(&self, keycode: u32, scancode: u32) -> EventDeviceResult<()> {
        let mut buf = uint_pair(keycode, scancode);

        self.control(ioctl::EVIOCSKEYCODE, &mut buf)
    }

    /// Read the autorepeat settings using the `EVIOCGREP` ioctl.
    ///
    /// Without the `repeat-rate` feature this fails with
    /// [`EventDeviceError::FeatureUnavailable`].
    pub fn repeat_rate(&self) -> EventDeviceResult<RepeatRate> {
        self.repeat_rate_if(REPEAT_RATE_SUPPORTED)
    }

    /// Change the autorepeat settings using the `EVIOCSREP` ioctl.
    ///
    /// Without the `repeat-rate` feature this fails with
    /// [`EventDeviceError::FeatureUnavailable`].
    pub fn set_repeat_rate(
        &self,
        initial_delay: u32,
        repeat_interval: u32,
    ) -> EventDeviceResult<()> {
        self.set_repeat_rate_if(REPEAT_RATE_SUPPORTED, initial_delay, repeat_interval)
    }

    fn repeat_rate_if(&self, supported: bool) -> EventDeviceResult<RepeatRate> {
        if !supported {
            return Err(EventDeviceError::FeatureUnavailable("repeat rate"));
        }

        let mut buf = [0u8; UINT_PAIR_LEN];

        self.control(ioctl::EVIOCGREP, &mut buf)?;

        let (initial_delay, repeat_interval) = split_uint_pair(&buf);

        Ok(RepeatRate {
            initial_delay,
            repeat_interval,
        })
    }

    fn set_repeat_rate_if(
        &self,
        supported: bool,
        initial_delay: u32,
        repeat_interval: u32,
    ) -> EventDeviceResult<()> {
        if !supported {
            return Err(EventDeviceError::FeatureUnavailable("repeat rate"));
        }

        let mut buf = uint_pair(initial_delay, repeat_interval);

        self.control(ioctl::EVIOCSREP, &mut buf)
    }
}

impl<H: Read> EventDevice<H> {
    /// Read the next event, blocking until one is available.
    ///
    /// The handle must return a whole record per read. Anything else is reported as
    /// [`EventDeviceError::Format`], including the end of the stream.
    pub fn read_event(&mut self) -> EventDeviceResult<InputEventRecord> {
        let mut buf = [0u8; EVENT_RECORD_LEN];

        let n = self.handle.read(&mut buf)?;
        let record = event::decode(&buf[..n])?;

        log::trace!("read {record:?}");

        Ok(record)
    }
}

impl<H: Write> EventDevice<H> {
    /// Write an event to the device (e.g. `EV_LED`, `LED_SCROLLL`, `1` lights the scroll
    /// lock LED). Returns the number of bytes written.
    pub fn write_event(
        &mut self,
        event_type: u16,
        code: FeatureCode,
        value: i32,
    ) -> EventDeviceResult<usize> {
        self.write_record(&InputEventRecord::new(event_type, code, value))
    }

    pub fn write_record(&mut self, record: &InputEventRecord) -> EventDeviceResult<usize> {
        let bytes = event::encode(record)?;

        let n = self.handle.write(&bytes)?;
        if n != bytes.len() {
            return Err(EventDeviceError::Format(format!(
                "short write: {n} of {} bytes",
                bytes.len()
            )));
        }

        log::trace!("wrote {record:?}");

        Ok(n)
    }
}

fn uint_pair(first: u32, second: u32) -> [u8; UINT_PAIR_LEN] {
    let mut buf = [0u8; UINT_PAIR_LEN];
    buf[..4].copy_from_slice(&first.to_ne_bytes());
    buf[4..].copy_from_slice(&second.to_ne_bytes());
    buf
}

fn split_uint_pair(buf: &[u8; UINT_PAIR_LEN]) -> (u32, u32) {
    let [a, b, c, d, e, f, g, h] = *buf;
    (u32::from_ne_bytes([a, b, c, d]), u32::from_ne_bytes([e, f, g, h]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::event_codes::{EV_ABS, EV_REL, EV_SYN};
    use crate::testing::{i32s, u16s, u32s, FakeHandle, FAKE_FD};

    fn device(handle: FakeHandle) -> EventDevice<FakeHandle> {
        EventDevice::new(handle)
    }

    fn identity_handle() -> FakeHandle {
        FakeHandle::new()
            .reply(ioctl::EVIOCGID, u16s(&[3, 0x046d, 0xc031, 0x0111]))
            .reply(ioctl::EVIOCGVERSION, 0x010001u32.to_ne_bytes())
    }

    #[test]
    fn identity_fields() {
        let dev = device(identity_handle());

        assert_eq!(dev.bus_type().unwrap(), 3);
        assert_eq!(dev.vendor().unwrap(), 0x046d);
        assert_eq!(dev.product().unwrap(), 0xc031);
        assert_eq!(dev.version().unwrap(), 0x0111);

        // No caching: one EVIOCGID per field
        assert_eq!(dev.handle().issued(), vec!["EVIOCGID"; 4]);
    }

    #[test]
    fn identity_snapshot() {
        let identity = device(identity_handle()).identity().unwrap();

        assert_eq!(
            identity,
            DeviceIdentity {
                bus_type: 3,
                vendor: 0x046d,
                product: 0xc031,
                version: 0x0111,
                interface_version: InterfaceVersion {
                    major: 1,
                    minor: 0,
                    patch: 1
                },
            }
        );
    }

    #[test]
    fn interface_version_string() {
        let dev = device(identity_handle());

        assert_eq!(dev.interface_version().unwrap().to_string(), "1.0.1");
        assert_eq!(InterfaceVersion::from_raw(0x0a0b0c).to_string(), "10.11.12");
    }

    #[test]
    fn strings_stop_at_nul() {
        let dev = device(
            FakeHandle::new()
                .reply(ioctl::eviocgname(256), b"Logitech USB Optical Mouse\0junk".to_vec())
                .reply(ioctl::eviocgphys(256), b"usb-0000:00:1d.7-1.2.1/input0\0".to_vec())
                .reply(ioctl::eviocguniq(256), vec![0u8]),
        );

        assert_eq!(dev.device_name().unwrap(), "Logitech USB Optical Mouse");
        assert_eq!(dev.topology().unwrap(), "usb-0000:00:1d.7-1.2.1/input0");
        assert_eq!(dev.unique_id().unwrap(), "");
    }

    #[test]
    fn unterminated_name_uses_whole_buffer() {
        let dev = device(FakeHandle::new().reply(ioctl::eviocgname(256), vec![b'a'; 300]));

        assert_eq!(dev.device_name().unwrap().len(), DEVICE_STRING_MAX_LEN);
    }

    #[test]
    fn missing_topology_is_an_error() {
        let dev = device(FakeHandle::new().fail(ioctl::eviocgphys(256), libc::ENOTTY));

        let err = dev.topology().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::WrongDeviceOrRequest);
        assert_eq!(err.request().map(|r| r.name), Some("EVIOCGPHYS"));
        assert!(err.to_string().contains(&format!("fd {FAKE_FD}")));
    }

    #[test]
    fn control_errors_are_mapped() {
        for (errno, kind) in [
            (libc::EBADF, ErrorKind::InvalidHandle),
            (libc::EFAULT, ErrorKind::InternalFault),
            (libc::EINVAL, ErrorKind::UnsupportedRequest),
            (libc::EIO, ErrorKind::UnknownControlFailure),
        ] {
            let dev = device(FakeHandle::new().fail(ioctl::EVIOCGID, errno));

            let err = dev.vendor().unwrap_err();

            assert_eq!(err.kind(), kind);
            assert_eq!(err.errno(), Some(errno));
        }
    }

    #[test]
    fn supported_types() {
        let bits: libc::c_ulong = (1 << EV_SYN) | (1 << EV_KEY) | (1 << EV_REL);
        let len = std::mem::size_of::<libc::c_ulong>();
        let dev = device(FakeHandle::new().reply(ioctl::eviocgbit(0, len).unwrap(), bits.to_ne_bytes()));

        assert_eq!(
            dev.supported_feature_types().unwrap(),
            vec![EV_SYN, EV_KEY, EV_REL]
        );
        assert!(dev.supports_feature_type(EV_REL).unwrap());
        assert!(!dev.supports_feature_type(EV_ABS).unwrap());
    }

    #[test]
    fn supported_features_span_words() {
        let word_bits = libc::c_ulong::BITS as usize;
        let mut words: Vec<libc::c_ulong> = vec![0; 96 * 8 / word_bits];
        // BTN_LEFT (0x110) and BTN_RIGHT (0x111)
        words[0x110 / word_bits] = 0b11 << (0x110 % word_bits);
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_ne_bytes()).collect();
        let dev = device(FakeHandle::new().reply(ioctl::eviocgbit(EV_KEY, 96).unwrap(), bytes));

        assert_eq!(
            dev.supported_features_for_type(EV_KEY).unwrap(),
            vec![0x110, 0x111]
        );
    }

    #[test]
    fn unsupported_type_yields_nothing() {
        let dev = device(
            FakeHandle::new().reply(ioctl::eviocgbit(EV_ABS, 96).unwrap(), vec![0u8; 96]),
        );

        assert!(dev.supported_features_for_type(EV_ABS).unwrap().is_empty());
    }

    #[test]
    fn type_past_ev_max_yields_nothing() {
        // 0x20 + 0x20 is the EVIOCGABS(ABS_X) number
        let abs_x = i32s(&[-1, -1, -1, -1, -1, -1]);
        let dev = device(FakeHandle::new().reply(ioctl::eviocgabs(0).unwrap(), abs_x));

        assert!(dev.supported_features_for_type(EV_MAX + 1).unwrap().is_empty());
        assert!(dev.handle().issued().is_empty());
    }

    #[test]
    fn activated_state() {
        let mut leds = vec![0u8; 96];
        leds[0] = 0b101;
        let mut keys = vec![0u8; 96];
        keys[3] = 0b1000_0000; // KEY_S (31)
        let dev = device(
            FakeHandle::new()
                .reply(ioctl::eviocgled(96), leds)
                .reply(ioctl::eviocgkey(96), keys)
                .reply(ioctl::eviocgsnd(96), vec![0u8; 96]),
        );

        assert_eq!(dev.activated_leds().unwrap(), vec![0, 2]);
        assert_eq!(dev.activated_keys().unwrap(), vec![31]);
        assert!(dev.activated_sounds().unwrap().is_empty());
        assert!(dev.is_activated(EV_LED, 2).unwrap());
        assert!(!dev.is_activated(EV_LED, 1).unwrap());
    }

    #[test]
    fn no_state_for_other_types() {
        let dev = device(FakeHandle::new());

        let err = dev.activated_features_for_type(EV_ABS).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NoActivationState);
        assert!(dev.handle().issued().is_empty());
    }

    #[test]
    fn axis_parameters() {
        let dev = device(
            FakeHandle::new().reply(ioctl::eviocgabs(0).unwrap(), i32s(&[512, 0, 1023, 4, 8, 0])),
        );

        assert_eq!(
            dev.axis_parameters(0).unwrap(),
            AxisInfo {
                value: 512,
                minimum: 0,
                maximum: 1023,
                fuzz: 4,
                flat: 8,
            }
        );
    }

    #[test]
    fn axis_parameters_for_missing_axis() {
        let dev = device(FakeHandle::new().reply(ioctl::eviocgabs(5).unwrap(), vec![0u8; 24]));

        assert_eq!(dev.axis_parameters(5).unwrap(), AxisInfo::default());
    }

    #[test]
    fn axis_past_abs_max_is_not_aliased() {
        // A driver only knows the real axes: 0x41 must not be answered as ABS_Y
        let dev = device(
            FakeHandle::new()
                .reply(ioctl::eviocgabs(1).unwrap(), i32s(&[7, 0, 255, 0, 0, 0]))
                .fail(ioctl::eviocgabs(0x41).unwrap(), libc::EINVAL),
        );

        let err = dev.axis_parameters(0x41).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnsupportedRequest);
        assert_eq!(err.request(), ioctl::eviocgabs(0x41));
    }

    #[test]
    fn axis_without_request_number() {
        let dev = device(FakeHandle::new());

        let err = dev.axis_parameters(0xc0).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnsupportedRequest);
        assert_eq!(err.errno(), Some(libc::EINVAL));
        assert!(dev.handle().issued().is_empty());
    }

    #[test]
    fn keycode_mapping() {
        let dev = device(FakeHandle::new().reply(ioctl::EVIOCGKEYCODE, u32s(&[30, 0x1e])));

        assert_eq!(dev.scancode_for(30).unwrap(), 0x1e);
        assert_eq!(dev.handle().sent()[0], u32s(&[30, 0]));
    }

    #[test]
    fn set_keycode_mapping() {
        let dev = device(FakeHandle::new().reply(ioctl::EVIOCSKEYCODE, Vec::new()));

        dev.set_scancode_for(203, 205).unwrap();

        assert_eq!(dev.handle().sent()[0], u32s(&[203, 205]));
    }

    #[test]
    fn remapping_unsupported() {
        let dev = device(FakeHandle::new().fail(ioctl::EVIOCGKEYCODE, libc::EINVAL));

        assert_eq!(
            dev.scancode_for(1).unwrap_err().kind(),
            ErrorKind::UnsupportedRequest
        );
    }

    #[cfg(feature = "repeat-rate")]
    #[test]
    fn repeat_rate() {
        let dev = device(
            FakeHandle::new()
                .reply(ioctl::EVIOCGREP, u32s(&[250, 33]))
                .reply(ioctl::EVIOCSREP, Vec::new()),
        );

        assert_eq!(
            dev.repeat_rate().unwrap(),
            RepeatRate {
                initial_delay: 250,
                repeat_interval: 33
            }
        );

        dev.set_repeat_rate(2500, 1000).unwrap();
        assert_eq!(dev.handle().sent()[1], u32s(&[2500, 1000]));
    }

    #[test]
    fn repeat_rate_unavailable() {
        let dev = device(
            FakeHandle::new()
                .reply(ioctl::EVIOCGREP, u32s(&[250, 33]))
                .reply(ioctl::EVIOCSREP, Vec::new()),
        );

        assert_eq!(
            dev.repeat_rate_if(false).unwrap_err().kind(),
            ErrorKind::FeatureUnavailable
        );
        assert_eq!(
            dev.set_repeat_rate_if(false, 1, 1).unwrap_err().kind(),
            ErrorKind::FeatureUnavailable
        );
        assert!(dev.handle().issued().is_empty());
    }

    #[cfg(not(feature = "repeat-rate"))]
    #[test]
    fn repeat_rate_disabled_build() {
        let dev = device(FakeHandle::new());

        assert_eq!(
            dev.repeat_rate().unwrap_err().kind(),
            ErrorKind::FeatureUnavailable
        );
        assert_eq!(
            dev.set_repeat_rate(1, 1).unwrap_err().kind(),
            ErrorKind::FeatureUnavailable
        );
        assert!(dev.handle().issued().is_empty());
    }

    #[test]
    fn read_events() {
        let press = InputEventRecord::new(EV_KEY, 30, 1);
        let syn = InputEventRecord::new(EV_SYN, 0, 0);
        let mut input = event::encode(&press).unwrap();
        input.extend(event::encode(&syn).unwrap());
        let mut dev = device(FakeHandle::new().with_input(input));

        assert_eq!(dev.read_event().unwrap(), press);
        assert_eq!(dev.read_event().unwrap(), syn);
        // End of stream
        assert_eq!(dev.read_event().unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn truncated_read() {
        let mut dev = device(FakeHandle::new().with_input(vec![0u8; EVENT_RECORD_LEN - 1]));

        assert_eq!(dev.read_event().unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn write_events() {
        let mut dev = device(FakeHandle::new());

        assert_eq!(dev.write_event(EV_LED, 2, 1).unwrap(), EVENT_RECORD_LEN);

        let written = event::decode(&dev.handle().written).unwrap();
        assert_eq!(written, InputEventRecord::new(EV_LED, 2, 1));
    }

    #[test]
    fn short_write() {
        let mut handle = FakeHandle::new();
        handle.write_limit = Some(8);
        let mut dev = device(handle);

        assert_eq!(
            dev.write_event(EV_LED, 2, 1).unwrap_err().kind(),
            ErrorKind::Format
        );
    }
}
