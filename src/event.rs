//! Codec for the native `struct input_event` record.
//!
//! Records are laid out exactly like [`libc::input_event`] on the build target: the field
//! offsets and the total length come from the C struct, so any padding between the
//! timestamp and the `type`/`code`/`value` fields is preserved (and written as zero).

use crate::error::EventDeviceError;
use crate::EventDeviceResult;
use chrono::{DateTime, Utc};
use std::mem::{self, offset_of};

/// The size of one encoded event record.
pub const EVENT_RECORD_LEN: usize = mem::size_of::<libc::input_event>();

const TIME_OFFSET: usize = offset_of!(libc::input_event, time);
const SEC_OFFSET: usize = TIME_OFFSET + offset_of!(libc::timeval, tv_sec);
const USEC_OFFSET: usize = TIME_OFFSET + offset_of!(libc::timeval, tv_usec);
const TYPE_OFFSET: usize = offset_of!(libc::input_event, type_);
const CODE_OFFSET: usize = offset_of!(libc::input_event, code);
const VALUE_OFFSET: usize = offset_of!(libc::input_event, value);

const SEC_LEN: usize = mem::size_of::<libc::time_t>();
const USEC_LEN: usize = mem::size_of::<libc::suseconds_t>();

/// The time at which the kernel generated an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub seconds: i64,
    pub microseconds: i64,
}

/// A single input event, as read from or written to an event device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InputEventRecord {
    /// The event type (e.g. `EV_KEY`).
    pub event_type: u16,
    /// The feature code within `event_type` (e.g. `KEY_A`).
    pub code: u16,
    /// The new value of the feature.
    pub value: i32,
    pub timestamp: Timestamp,
}

impl InputEventRecord {
    /// An event with a zero timestamp. The kernel stamps events written to a device.
    pub fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            event_type,
            code,
            value,
            timestamp: Timestamp::default(),
        }
    }

    /// The timestamp of the event as a UTC date.
    pub fn time(&self) -> EventDeviceResult<DateTime<Utc>> {
        let Timestamp {
            seconds,
            microseconds,
        } = self.timestamp;

        u32::try_from(microseconds)
            .ok()
            .filter(|usec| *usec < 1_000_000)
            .and_then(|usec| DateTime::<Utc>::from_timestamp(seconds, usec * 1000))
            .ok_or(EventDeviceError::InvalidTimestamp(seconds, microseconds))
    }
}

impl From<libc::input_event> for InputEventRecord {
    fn from(ev: libc::input_event) -> Self {
        Self {
            event_type: ev.type_,
            code: ev.code,
            value: ev.value,
            timestamp: Timestamp {
                seconds: i64::from(ev.time.tv_sec),
                microseconds: i64::from(ev.time.tv_usec),
            },
        }
    }
}

impl TryFrom<InputEventRecord> for libc::input_event {
    type Error = EventDeviceError;

    fn try_from(record: InputEventRecord) -> Result<Self, Self::Error> {
        let (tv_sec, tv_usec) = native_time(&record.timestamp)?;

        Ok(libc::input_event {
            time: libc::timeval { tv_sec, tv_usec },
            type_: record.event_type,
            code: record.code,
            value: record.value,
        })
    }
}

/// Decode exactly one record from `bytes`.
pub fn decode(bytes: &[u8]) -> EventDeviceResult<InputEventRecord> {
    if bytes.len() != EVENT_RECORD_LEN {
        return Err(EventDeviceError::Format(format!(
            "expected {EVENT_RECORD_LEN} bytes, got {}",
            bytes.len()
        )));
    }

    let tv_sec = libc::time_t::from_ne_bytes(field(bytes, SEC_OFFSET));
    let tv_usec = libc::suseconds_t::from_ne_bytes(field(bytes, USEC_OFFSET));

    Ok(InputEventRecord {
        event_type: u16::from_ne_bytes(field(bytes, TYPE_OFFSET)),
        code: u16::from_ne_bytes(field(bytes, CODE_OFFSET)),
        value: i32::from_ne_bytes(field(bytes, VALUE_OFFSET)),
        timestamp: Timestamp {
            seconds: i64::from(tv_sec),
            microseconds: i64::from(tv_usec),
        },
    })
}

/// Encode `record` into exactly [`EVENT_RECORD_LEN`] bytes.
pub fn encode(record: &InputEventRecord) -> EventDeviceResult<Vec<u8>> {
    let (tv_sec, tv_usec) = native_time(&record.timestamp)?;
    let mut bytes = vec![0u8; EVENT_RECORD_LEN];

    bytes[SEC_OFFSET..SEC_OFFSET + SEC_LEN].copy_from_slice(&tv_sec.to_ne_bytes());
    bytes[USEC_OFFSET..USEC_OFFSET + USEC_LEN].copy_from_slice(&tv_usec.to_ne_bytes());
    bytes[TYPE_OFFSET..TYPE_OFFSET + 2].copy_from_slice(&record.event_type.to_ne_bytes());
    bytes[CODE_OFFSET..CODE_OFFSET + 2].copy_from_slice(&record.code.to_ne_bytes());
    bytes[VALUE_OFFSET..VALUE_OFFSET + 4].copy_from_slice(&record.value.to_ne_bytes());

    Ok(bytes)
}

fn native_time(ts: &Timestamp) -> EventDeviceResult<(libc::time_t, libc::suseconds_t)> {
    let out_of_range = || {
        EventDeviceError::Format(format!(
            "timestamp {}s {}us does not fit in a timeval",
            ts.seconds, ts.microseconds
        ))
    };

    let sec = libc::time_t::try_from(ts.seconds).map_err(|_| out_of_range())?;
    let usec = libc::suseconds_t::try_from(ts.microseconds).map_err(|_| out_of_range())?;

    Ok((sec, usec))
}

/// Copy `N` bytes starting at `offset`. The caller has checked the record length.
fn field<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[offset..offset + N]);
    out
}
