//! Settings command for printing the effective configuration.

use std::io::Write;

use anyhow::{Result, bail};
use clk_core::Settings;

const NOT_SET: &str = "(not set)";

fn value(settings: &Settings, section: &str, key: &str) -> String {
    settings
        .read(section, key)
        .map_or_else(|| NOT_SET.to_string(), |value| value.to_string())
}

/// Prints every setting, or a single one given as `section.key`.
pub fn run<W: Write>(writer: &mut W, settings: &Settings, key: Option<&str>) -> Result<()> {
    let Some(name) = key else {
        for (section, key) in Settings::KEYS {
            writeln!(writer, "{section}.{key} = {}", value(settings, section, key))?;
        }
        return Ok(());
    };

    let known = name.split_once('.').filter(|(section, key)| {
        Settings::KEYS
            .iter()
            .any(|(known_section, known_key)| known_section == section && known_key == key)
    });
    let Some((section, key)) = known else {
        bail!("unknown setting: {name}");
    };
    writeln!(writer, "{}", value(settings, section, key))?;
    Ok(())
}
