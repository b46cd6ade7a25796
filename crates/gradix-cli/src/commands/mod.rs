pub mod grade;
pub mod lint;
pub mod list_validators;
