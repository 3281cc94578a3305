// ABOUTME: Configuration constants shared across Larder packages
// ABOUTME: Environment variable names and their default values

pub mod constants;

pub use constants::*;
