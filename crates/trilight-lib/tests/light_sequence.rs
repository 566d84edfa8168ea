//! Integration tests: end-to-end light updates through the public API.
//!
//! The mock port checks write order and failure handling; a fake sysfs tree
//! in a temp directory checks the real file backend, including concurrent
//! callers sharing one registry.

use std::path::Path;
use std::time::Duration;

use trilight_lib::arbiter::LedOutput;
use trilight_lib::paths::{Endpoint, EndpointPaths};
use trilight_lib::port::SysfsPort;
use trilight_lib::port::mock::MockPort;
use trilight_lib::{Channel, LightState, Lights};

const RED: u32 = 0xFFFF_0000;
const GREEN: u32 = 0xFF00_FF00;
const BLUE: u32 = 0xFF00_00FF;

/// Helper: create every endpoint file under `root`, holding `0`.
fn fake_sysfs(root: &Path) -> EndpointPaths {
    let paths = EndpointPaths::under(root);
    for e in Endpoint::ALL {
        let p = paths.get(e);
        std::fs::create_dir_all(p.parent().unwrap()).unwrap();
        std::fs::write(p, "0\n").unwrap();
    }
    paths
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

// ── priority across a sequence of updates ──

#[test]
fn battery_notification_attention_sequence() {
    let port = MockPort::new();
    let lights =
        Lights::new(&port, EndpointPaths::default()).with_settle_delay(Duration::ZERO);
    let p = EndpointPaths::default();

    // 1. Charging: battery solid blue.
    lights
        .open("battery")
        .unwrap()
        .set_light(&LightState::solid(BLUE))
        .unwrap();
    assert_eq!(port.value(&p.blue), Some(48));

    // 2. A notification arrives: red blinking takes over.
    lights
        .set_light(Channel::Notifications, &LightState::flashing(RED, 500, 2000))
        .unwrap();
    assert_eq!(port.value(&p.red_blink), Some(1));
    assert_eq!(port.value(&p.blue), Some(0));

    // 3. Attention: steady green beats the notification.
    lights
        .set_light(Channel::Attention, &LightState::solid(GREEN))
        .unwrap();
    assert_eq!(port.value(&p.red_blink), Some(0));
    assert_eq!(port.value(&p.green), Some(48));

    // 4. Attention and notification cleared: back to battery.
    lights
        .set_light(Channel::Attention, &LightState::default())
        .unwrap();
    lights
        .set_light(Channel::Notifications, &LightState::default())
        .unwrap();
    assert_eq!(port.value(&p.green), Some(0));
    assert_eq!(port.value(&p.blue), Some(48));
    assert_eq!(lights.snapshot().active, Channel::Battery);
}

#[test]
fn off_duration_only_turns_led_off() {
    let port = MockPort::new();
    let lights =
        Lights::new(&port, EndpointPaths::default()).with_settle_delay(Duration::ZERO);
    lights
        .set_light(Channel::Notifications, &LightState::flashing(RED, 0, 500))
        .unwrap();
    let snap = lights.snapshot();
    // Still the winner (it is lit), but it shows as off.
    assert_eq!(snap.active, Channel::Notifications);
    assert!(snap.output.is_off());
    let writes = port.take_writes();
    assert!(writes.iter().all(|(_, v)| *v == 0));
}

#[test]
fn failing_blink_file_does_not_stop_others() {
    let port = MockPort::new();
    let p = EndpointPaths::default();
    port.fail_path(p.green_blink.clone());
    let lights = Lights::new(&port, p.clone()).with_settle_delay(Duration::ZERO);

    let err = lights
        .set_light(Channel::Attention, &LightState::flashing(0xFFFF_FFFF, 100, 100))
        .unwrap_err();
    assert_eq!(err.code(), -13);
    assert_eq!(port.value(&p.red_blink), Some(1));
    assert_eq!(port.value(&p.blue_blink), Some(1));
    // The stored state is updated even though the hardware write failed.
    assert_eq!(lights.snapshot().active, Channel::Attention);
}

// ── real files ──

#[test]
fn sysfs_tree_receives_values() {
    let dir = tempfile::tempdir().unwrap();
    let paths = fake_sysfs(dir.path());
    let lights = Lights::new(SysfsPort::new(), paths.clone()).with_settle_delay(Duration::ZERO);

    lights
        .set_light(Channel::Battery, &LightState::solid(0xFFFF_8000))
        .unwrap();
    assert_eq!(read(&paths.red), "48\n");
    assert_eq!(read(&paths.green), "24\n");
    assert_eq!(read(&paths.blue), "0\n");

    lights
        .set_light(Channel::Backlight, &LightState::solid(0xFF80_8080))
        .unwrap();
    assert_eq!(read(&paths.backlight), "128\n");
    assert_eq!(lights.read(Endpoint::Backlight).unwrap(), 128);
}

#[test]
fn missing_led_degrades_gracefully() {
    let dir = tempfile::tempdir().unwrap();
    let paths = fake_sysfs(dir.path());
    std::fs::remove_file(&paths.blue).unwrap();
    let lights = Lights::new(SysfsPort::new(), paths.clone()).with_settle_delay(Duration::ZERO);

    for _ in 0..3 {
        let err = lights
            .set_light(Channel::Battery, &LightState::solid(0xFFFF_FFFF))
            .unwrap_err();
        assert_eq!(err.code(), -2);
    }
    assert_eq!(read(&paths.red), "48\n");
    assert_eq!(read(&paths.green), "48\n");
    assert!(!paths.blue.exists());
}

#[test]
fn concurrent_updates_leave_a_consistent_led() {
    let dir = tempfile::tempdir().unwrap();
    let paths = fake_sysfs(dir.path());
    let lights = Lights::new(SysfsPort::new(), paths.clone()).with_settle_delay(Duration::ZERO);

    std::thread::scope(|s| {
        for (channel, color) in [
            (Channel::Battery, BLUE),
            (Channel::Notifications, RED),
            (Channel::Battery, GREEN),
        ] {
            let lights = &lights;
            s.spawn(move || {
                for _ in 0..20 {
                    lights
                        .set_light(channel, &LightState::solid(color))
                        .unwrap();
                }
            });
        }
    });

    // Whatever order the threads ran in, notification ends up on top and the
    // files hold exactly its output.
    let snap = lights.snapshot();
    assert_eq!(snap.active, Channel::Notifications);
    assert_eq!(
        snap.output,
        LedOutput::Solid {
            red: 48,
            green: 0,
            blue: 0
        }
    );
    assert_eq!(read(&paths.red), "48\n");
    assert_eq!(read(&paths.green), "0\n");
    assert_eq!(read(&paths.blue), "0\n");
}
