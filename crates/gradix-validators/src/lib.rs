//! gradix-validators — Builtin validator plugins.
//!
//! Each module implements the `Validator` contract from `gradix-core` for
//! one kind of submission content. The CLI wires them into a per-run
//! registry via [`builtin_registry`].

pub mod cli_program;
pub mod layout;
pub mod ssh_config;

use gradix_core::registry::ValidatorRegistry;

/// Registry with every builtin validator registered under its stable id.
pub fn builtin_registry() -> ValidatorRegistry {
    let mut registry = ValidatorRegistry::new();
    registry
        .register("submission_layout", |cfg| {
            Box::new(layout::SubmissionLayoutValidator::new(cfg))
        })
        .expect("builtin validator ids are unique");
    registry
        .register("ssh_config", |cfg| {
            Box::new(ssh_config::SshConfigValidator::new(cfg))
        })
        .expect("builtin validator ids are unique");
    registry
        .register("cli_program", |cfg| {
            Box::new(cli_program::CliProgramValidator::new(cfg))
        })
        .expect("builtin validator ids are unique");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ids_are_registered() {
        let registry = builtin_registry();
        assert_eq!(
            registry.names(),
            vec!["cli_program", "ssh_config", "submission_layout"]
        );
    }
}
