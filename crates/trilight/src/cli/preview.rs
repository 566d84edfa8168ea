//! `preview` subcommand — show how a state would drive the LED.

use super::{
    PreviewOutput, Result, StateArgs, arbiter, color, describe_output, kv, kv_width, print_json,
};

pub(super) fn cmd_preview(args: &StateArgs, json: bool) -> Result<()> {
    let state = args.to_state()?;
    let (effective_flash, effective_color) = arbiter::effective_flash(&state);
    let output = arbiter::resolve_output(&state);

    if json {
        return print_json(&PreviewOutput {
            state,
            effective_flash,
            effective_color: color::format_color(effective_color),
            output,
        });
    }

    let w = kv_width(&["Requested:", "Effective:", "LED:"], &[]);
    kv(
        "Requested:",
        format_args!(
            "{} {} ({} ms on, {} ms off)",
            color::format_color(state.color),
            state.flash_mode,
            state.flash_on_ms,
            state.flash_off_ms
        ),
        w,
    );
    kv(
        "Effective:",
        format_args!(
            "{} {}",
            color::format_color(effective_color),
            effective_flash
        ),
        w,
    );
    kv("LED:", describe_output(&output), w);
    Ok(())
}
