//! gradix-core — Checklist execution and scoring engine.
//!
//! This crate defines the check/checklist model, the validator lifecycle
//! contract, the validator registry, and the grading run orchestration
//! that the rest of the gradix system builds on.

pub mod check;
pub mod checklist;
pub mod error;
pub mod grader;
pub mod mission;
pub mod registry;
pub mod report;
pub mod validator;
