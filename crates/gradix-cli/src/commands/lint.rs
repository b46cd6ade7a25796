//! The `gradix lint` command.

use std::path::PathBuf;

use anyhow::Result;

use gradix_core::mission::{lint_mission, parse_mission};

pub fn execute(mission_path: PathBuf) -> Result<i32> {
    let config = parse_mission(&mission_path)?;
    let warnings = lint_mission(&config);

    println!(
        "{}: {} ({} validators)",
        config.id,
        config.name,
        config.validators.len()
    );

    if warnings.is_empty() {
        println!("Mission config is clean");
        return Ok(0);
    }

    for warning in &warnings {
        match &warning.validator {
            Some(v) => println!("warning [{v}]: {}", warning.message),
            None => println!("warning: {}", warning.message),
        }
    }
    println!("{} warning(s)", warnings.len());

    Ok(0)
}
