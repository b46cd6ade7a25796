//! gradix-report — Serialized outputs for finished grading runs.
//!
//! The JSON form round-trips the full per-check breakdown losslessly; the
//! Markdown form is the human-readable rendering of the same data.

pub mod json;
pub mod markdown;
