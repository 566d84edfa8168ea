//! `set` / `off` subcommands — write one light, or clear the tri-color LED.

use std::path::Path;

use super::{
    Result, SetOutput, StateArgs, color, describe_output, kv, kv_width, load_config, open_lights,
    print_json,
};

pub(super) fn cmd_set(
    channel: &str,
    args: &StateArgs,
    json: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let state = args.to_state()?;
    let config = load_config(config_path);
    let lights = open_lights(&config);

    let handle = lights.open(channel)?;
    let channel = handle.channel();
    let result = handle.set_light(&state);
    handle.close();

    // A failed write still updates the stored tri-color state, so report
    // what the LED should show before surfacing the error.
    let led = channel.is_tricolor().then(|| lights.snapshot());

    if json {
        print_json(&SetOutput {
            channel,
            state,
            led,
        })?;
        return result;
    }

    let w = kv_width(&["Light:", "Color:", "Flash:", "Shown:", "LED:"], &[]);
    kv("Light:", channel, w);
    kv("Color:", color::format_color(state.color), w);
    kv(
        "Flash:",
        format_args!(
            "{} ({} ms on, {} ms off)",
            state.flash_mode, state.flash_on_ms, state.flash_off_ms
        ),
        w,
    );
    if let Some(snap) = led {
        kv("Shown:", snap.active, w);
        kv("LED:", describe_output(&snap.output), w);
    }
    result
}

pub(super) fn cmd_off(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let lights = open_lights(&config);
    lights.turn_off()?;
    println!("LED off");
    Ok(())
}
