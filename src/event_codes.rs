// Event types and namespace bounds (see [input-event-codes.h] and the [kernel docs]).
//
// [input-event-codes.h]: https://elixir.bootlin.com/linux/v5.19.17/source/include/uapi/linux/input-event-codes.h#L38
// [kernel docs]: https://www.kernel.org/doc/html/latest/input/event-codes.html
pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_REL: u16 = 0x02;
pub const EV_ABS: u16 = 0x03;
pub const EV_MSC: u16 = 0x04;
pub const EV_SW: u16 = 0x05;
pub const EV_LED: u16 = 0x11;
pub const EV_SND: u16 = 0x12;
pub const EV_REP: u16 = 0x14;
pub const EV_FF: u16 = 0x15;

/// Upper bound (exclusive) when scanning the supported event types.
pub const EV_MAX: u16 = 0x1f;
/// Upper bound (exclusive) when scanning feature codes and state bitmaps.
pub const KEY_MAX: u16 = 0x2ff;
