// Dump what an event device reports about itself, then print its events as they arrive.
//
// Usage: cargo run --example dumpinfo -- /dev/input/event3

use std::env;
use std::fs::File;
use std::process;

use eventdevice::{EventDevice, EventDeviceError, EV_ABS, EV_LED, EV_SND};

fn main() -> Result<(), EventDeviceError> {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: dumpinfo <device>");
        process::exit(2);
    };

    let mut device = EventDevice::new(File::open(&path)?);
    let identity = device.identity()?;

    println!("interface version is {}", identity.interface_version);
    println!("bus type is {:#06x}", identity.bus_type);
    println!("vendor is {:#06x}", identity.vendor);
    println!("product is {:#06x}", identity.product);
    println!("version is {:#06x}", identity.version);
    println!("name is {}", device.device_name()?);

    // Not every device has a topology or unique id
    match device.topology() {
        Ok(topology) => println!("topology is {topology}"),
        Err(e) => println!("topology unavailable: {e}"),
    }
    match device.unique_id() {
        Ok(uniq) => println!("unique id is {uniq:?}"),
        Err(e) => println!("unique id unavailable: {e}"),
    }
    match device.repeat_rate() {
        Ok(rate) => println!("repeat rate: {rate:?}"),
        Err(e) => println!("repeat rate unavailable: {e}"),
    }

    println!("activated keys: {:?}", device.activated_keys()?);

    for event_type in device.supported_feature_types()? {
        let codes = device.supported_features_for_type(event_type)?;
        println!("feature type {event_type:#04x}: {codes:?}");

        match event_type {
            EV_LED | EV_SND => println!(
                "  activated: {:?}",
                device.activated_features_for_type(event_type)?
            ),
            EV_ABS => {
                for code in codes {
                    println!("  axis {code:#04x}: {:?}", device.axis_parameters(code)?);
                }
            }
            _ => {}
        }
    }

    loop {
        let event = device.read_event()?;
        let time = event.time()?;

        println!(
            "[{time}] type={:#04x} code={:#05x} value={}",
            event.event_type, event.code, event.value
        );
    }
}
