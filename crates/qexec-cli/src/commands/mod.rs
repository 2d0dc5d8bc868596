//! CLI command implementations.

pub mod common;
pub mod example;
pub mod inspect;
pub mod optimize;
pub mod run;
pub mod version;
