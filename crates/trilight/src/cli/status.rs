//! `status` subcommand — read every endpoint.

use std::path::Path;

use super::{
    Endpoint, EndpointJson, Result, StatusOutput, kv, kv_indent, kv_width, load_config,
    open_lights, print_json,
};

pub(super) fn cmd_status(json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let lights = open_lights(&config);
    let values = lights.read_all();

    if json {
        let endpoints = values
            .into_iter()
            .map(|(e, v)| EndpointJson {
                endpoint: e.name().to_string(),
                path: lights.paths().get(e).display().to_string(),
                value: v.as_ref().ok().copied(),
                error: v.err().map(|err| err.to_string()),
            })
            .collect();
        return print_json(&StatusOutput {
            version: env!("CARGO_PKG_VERSION").to_string(),
            endpoints,
        });
    }

    let labels: Vec<String> = Endpoint::ALL
        .iter()
        .map(|e| format!("{}:", e.name()))
        .collect();
    let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    let w = kv_width(&["Version:"], &label_refs);

    kv("Version:", env!("CARGO_PKG_VERSION"), w);
    println!();
    println!("Endpoints:");
    for (endpoint, value) in &values {
        let label = format!("{}:", endpoint.name());
        match value {
            Ok(v) => kv_indent(&label, v, w),
            Err(e) => kv_indent(&label, format_args!("(unavailable: {e})"), w),
        }
    }
    Ok(())
}
