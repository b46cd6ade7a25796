//! The `gradix list-validators` command.

use anyhow::Result;

pub fn execute() -> Result<i32> {
    for name in gradix_validators::builtin_registry().names() {
        println!("{name}");
    }
    Ok(0)
}
