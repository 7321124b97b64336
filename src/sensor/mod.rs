//! Simulated sensor source

pub mod generator;

pub use generator::{step, ValueGenerator};
