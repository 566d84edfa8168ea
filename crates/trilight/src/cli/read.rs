//! `read` subcommand — read back one endpoint.

use std::path::Path;

use super::{Endpoint, EndpointJson, Result, load_config, open_lights, print_json};

pub(super) fn cmd_read(endpoint: &str, json: bool, config_path: Option<&Path>) -> Result<()> {
    let endpoint: Endpoint = endpoint.parse()?;
    let config = load_config(config_path);
    let lights = open_lights(&config);
    let value = lights.read(endpoint)?;

    if json {
        return print_json(&EndpointJson {
            endpoint: endpoint.name().to_string(),
            path: lights.paths().get(endpoint).display().to_string(),
            value: Some(value),
            error: None,
        });
    }

    println!("{value}");
    Ok(())
}
