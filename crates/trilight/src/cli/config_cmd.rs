//! `config` subcommand — show current configuration and endpoint paths.

use std::path::Path;

use super::{
    Config, ConfigOutput, Endpoint, Result, TrilightError, kv, kv_indent, kv_width, load_config,
    print_json,
};

/// Write a default config to `custom_path` or the platform location.
pub(super) fn cmd_config_init(custom_path: Option<&Path>) -> Result<()> {
    let path = custom_path
        .map(|p| p.to_path_buf())
        .or_else(Config::path)
        .ok_or_else(|| TrilightError::Config("no config directory".into()))?;
    if path.exists() {
        return Err(TrilightError::Config(format!(
            "{} already exists",
            path.display()
        )));
    }
    Config::default().save_to(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

pub(super) fn cmd_config(json: bool, custom_path: Option<&Path>) -> Result<()> {
    let config = load_config(custom_path);
    let config_path = custom_path.map(|p| p.to_path_buf()).or_else(Config::path);
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());
    let problems: Vec<String> = match config.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(ToString::to_string).collect(),
    };
    let endpoints = config.endpoint_paths();

    if json {
        return print_json(&ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config,
            problems,
            endpoints,
        });
    }

    let labels: Vec<String> = Endpoint::ALL
        .iter()
        .map(|e| format!("{}:", e.name()))
        .collect();
    let mut indent: Vec<&str> = vec!["sysfs_root:", "blink_settle_ms:"];
    indent.extend(labels.iter().map(String::as_str));
    let w = kv_width(&["Config file:"], &indent);

    match &config_path {
        Some(p) => {
            if config_exists {
                kv("Config file:", format_args!("{} (loaded)", p.display()), w);
            } else {
                kv(
                    "Config file:",
                    format_args!("{} (not found, using defaults)", p.display()),
                    w,
                );
            }
        }
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    let root = if config.sysfs_root.trim().is_empty() {
        "/"
    } else {
        config.sysfs_root.as_str()
    };
    kv_indent("sysfs_root:", root, w);
    kv_indent("blink_settle_ms:", config.blink_settle_ms, w);
    println!();

    println!("Endpoints:");
    for (endpoint, label) in Endpoint::ALL.iter().zip(&labels) {
        let path = endpoints.get(*endpoint);
        let overridden = config.paths.contains_key(endpoint.config_key())
            || config.paths.contains_key(endpoint.name());
        let suffix = if overridden { " (override)" } else { "" };
        kv_indent(label, format_args!("{}{suffix}", path.display()), w);
    }

    if !problems.is_empty() {
        println!();
        println!("Problems:");
        for p in &problems {
            println!("  {p}");
        }
    }
    Ok(())
}
